use crate::geocoding::GeocodeOutcome;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row of the output CSV
pub const HEADER: [&str; 3] = ["Stop Name", "Latitude", "Longitude"];

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRecord {
    pub place_name: String,
    /// Empty in the CSV when the lookup did not find anything
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl GeocodeRecord {
    pub fn from_outcome(place_name: &str, outcome: &GeocodeOutcome) -> Self {
        let (latitude, longitude) = match outcome {
            GeocodeOutcome::Found(coordinates) => (
                Some(coordinates.lat.clone()),
                Some(coordinates.lon.clone()),
            ),
            GeocodeOutcome::NotFound | GeocodeOutcome::Failed(_) => (None, None),
        };

        Self {
            place_name: place_name.to_string(),
            latitude,
            longitude,
        }
    }
}

/// Streams geocode records to CSV, one flushed row at a time
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file and write the header
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer
            .write_record(HEADER)
            .context("Failed to write CSV header")?;
        writer.flush().context("Failed to flush CSV header")?;

        Ok(Self { writer })
    }

    pub fn write_record(&mut self, record: &GeocodeRecord) -> Result<()> {
        self.writer
            .write_record([
                record.place_name.as_str(),
                record.latitude.as_deref().unwrap_or(""),
                record.longitude.as_deref().unwrap_or(""),
            ])
            .with_context(|| format!("Failed to write row for {}", record.place_name))?;
        self.writer.flush().context("Failed to flush CSV output")
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))
    }
}
