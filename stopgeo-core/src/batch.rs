use crate::config::GeocodeConfig;
use crate::geocoding::{geocode_place, GeocodeOutcome, Geocoder};
use crate::input::read_place_names;
use crate::output::{CsvSink, GeocodeRecord};
use anyhow::Result;
use log::{error, info, warn};
use std::io::Write;
use std::path::Path;

/// Counts of per-item outcomes for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &GeocodeOutcome) {
        self.total += 1;
        match outcome {
            GeocodeOutcome::Found(_) => self.found += 1,
            GeocodeOutcome::NotFound => self.not_found += 1,
            GeocodeOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Geocodes place names one at a time, pacing requests and streaming rows to CSV
pub struct BatchConverter<G: Geocoder> {
    geocoder: G,
    config: GeocodeConfig,
}

impl<G: Geocoder> BatchConverter<G> {
    pub fn new(geocoder: G, config: GeocodeConfig) -> Self {
        Self { geocoder, config }
    }

    /// Read `input`, geocode every place name and write the results to `output`.
    ///
    /// Only setup failures (unreadable input, uncreatable output) and write
    /// failures are returned; a failed lookup becomes an empty row.
    pub fn run(&self, input: &Path, output: &Path) -> Result<BatchSummary> {
        let places = read_place_names(input)?;
        let mut sink = CsvSink::create(output)?;

        info!(
            "Geocoding {} places from {} into {}",
            places.len(),
            input.display(),
            output.display()
        );

        let summary = self.convert(&places, &mut sink)?;

        info!(
            "Finished {} places: {} found, {} not found, {} failed",
            summary.total, summary.found, summary.not_found, summary.failed
        );

        Ok(summary)
    }

    /// Geocode `places` in order, writing exactly one row per place
    pub fn convert<W: Write>(
        &self,
        places: &[String],
        sink: &mut CsvSink<W>,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for place in places {
            let outcome = geocode_place(&self.geocoder, place, &self.config.region_suffix);

            match &outcome {
                GeocodeOutcome::Found(coordinates) => {
                    info!("{}: {}, {}", place, coordinates.lat, coordinates.lon)
                }
                GeocodeOutcome::NotFound => warn!("Not found: {}", place),
                GeocodeOutcome::Failed(detail) => error!("Error for {}: {}", place, detail),
            }

            sink.write_record(&GeocodeRecord::from_outcome(place, &outcome))?;
            summary.record(&outcome);

            // Paces every request, successful or not
            if !self.config.request_delay.is_zero() {
                std::thread::sleep(self.config.request_delay);
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Simulated service: maps a place name to a canned body or an error
    struct ScriptedGeocoder {
        responses: HashMap<&'static str, Result<&'static str, &'static str>>,
        queries: RefCell<Vec<String>>,
    }

    impl ScriptedGeocoder {
        fn new(responses: &[(&'static str, Result<&'static str, &'static str>)]) -> Self {
            Self {
                responses: responses.iter().cloned().collect(),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for ScriptedGeocoder {
        fn search(&self, query: &str) -> Result<String> {
            self.queries.borrow_mut().push(query.to_string());
            let place = query.trim_end_matches(", Davao City, Philippines");
            match self.responses.get(place) {
                Some(Ok(body)) => Ok(body.to_string()),
                Some(Err(e)) => Err(anyhow::anyhow!(e.to_string())),
                None => Ok("[]".to_string()),
            }
        }
    }

    fn test_config() -> GeocodeConfig {
        GeocodeConfig {
            request_delay: Duration::ZERO,
            ..GeocodeConfig::default()
        }
    }

    fn places(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn convert_to_string(geocoder: ScriptedGeocoder, names: &[&str]) -> (String, BatchSummary) {
        let converter = BatchConverter::new(geocoder, test_config());
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        let summary = converter.convert(&places(names), &mut sink).unwrap();
        let csv = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        (csv, summary)
    }

    #[test]
    fn test_found_row_copies_coordinates() {
        let body = r#"[{"lat":"7.1","lon":"125.6"}]"#;
        let geocoder = ScriptedGeocoder::new(&[("SM Lanang", Ok(body))]);
        let (csv, summary) = convert_to_string(geocoder, &["SM Lanang"]);

        assert_eq!(csv, "Stop Name,Latitude,Longitude\nSM Lanang,7.1,125.6\n");
        assert_eq!(summary.found, 1);
    }

    #[test]
    fn test_not_found_row_is_empty() {
        let geocoder = ScriptedGeocoder::new(&[("Unknown Place", Ok("[]"))]);
        let (csv, summary) = convert_to_string(geocoder, &["Unknown Place"]);

        assert_eq!(csv, "Stop Name,Latitude,Longitude\nUnknown Place,,\n");
        assert_eq!(summary.not_found, 1);
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let geocoder = ScriptedGeocoder::new(&[
            ("Bad Stop", Err("operation timed out")),
            ("Abreeza Mall", Ok(r#"[{"lat":"7.09","lon":"125.61"}]"#)),
        ]);
        let (csv, summary) = convert_to_string(geocoder, &["Bad Stop", "Abreeza Mall"]);

        assert_eq!(
            csv,
            "Stop Name,Latitude,Longitude\nBad Stop,,\nAbreeza Mall,7.09,125.61\n"
        );
        assert_eq!(
            summary,
            BatchSummary {
                total: 2,
                found: 1,
                not_found: 0,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_empty_json_body_counts_as_not_found() {
        let geocoder = ScriptedGeocoder::new(&[("Sasa", Ok("{}")), ("Lasang", Ok("null"))]);
        let (csv, summary) = convert_to_string(geocoder, &["Sasa", "Lasang"]);

        assert_eq!(csv, "Stop Name,Latitude,Longitude\nSasa,,\nLasang,,\n");
        assert_eq!(summary.not_found, 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_malformed_response_is_empty_row() {
        let geocoder = ScriptedGeocoder::new(&[
            ("Ecoland", Ok("<html>503</html>")),
            ("Matina", Ok(r#"[{"display_name":"Matina"}]"#)),
        ]);
        let (csv, summary) = convert_to_string(geocoder, &["Ecoland", "Matina"]);

        assert_eq!(csv, "Stop Name,Latitude,Longitude\nEcoland,,\nMatina,,\n");
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_one_row_per_place_in_order() {
        let names = ["Toril", "Calinan", "Toril", "Mintal", "Bunawan", "Sasa"];
        let geocoder = ScriptedGeocoder::new(&[
            ("Calinan", Ok(r#"[{"lat":"7.19","lon":"125.45"}]"#)),
            ("Mintal", Err("connection reset")),
            ("Sasa", Ok("{}")),
        ]);
        let (csv, summary) = convert_to_string(geocoder, &names);

        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), names.len());
        for (row, name) in rows.iter().zip(names.iter()) {
            assert!(row.starts_with(&format!("{},", name)));
        }
        assert_eq!(summary.total, names.len());
        assert_eq!(
            summary.found + summary.not_found + summary.failed,
            summary.total
        );
    }

    #[test]
    fn test_queries_carry_region_suffix() {
        let geocoder = ScriptedGeocoder::new(&[]);
        let converter = BatchConverter::new(geocoder, test_config());
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        converter
            .convert(&places(&["SM Lanang", "Abreeza Mall"]), &mut sink)
            .unwrap();

        assert_eq!(
            *converter.geocoder.queries.borrow(),
            vec![
                "SM Lanang, Davao City, Philippines",
                "Abreeza Mall, Davao City, Philippines",
            ]
        );
    }

    #[test]
    fn test_delay_after_every_item() {
        let geocoder = ScriptedGeocoder::new(&[("Bad Stop", Err("timeout"))]);
        let config = GeocodeConfig {
            request_delay: Duration::from_millis(20),
            ..GeocodeConfig::default()
        };
        let converter = BatchConverter::new(geocoder, config);
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();

        let start = Instant::now();
        converter
            .convert(&places(&["Bad Stop", "Toril", "Calinan"]), &mut sink)
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_run_end_to_end() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("stops.txt");
        let output = temp_dir.path().join("stops_with_coordinates.csv");
        fs::write(&input, "SM Lanang\n\n   \nAbreeza Mall\n")?;

        let geocoder = ScriptedGeocoder::new(&[
            ("SM Lanang", Ok(r#"[{"lat":"7.1","lon":"125.6"}]"#)),
            ("Abreeza Mall", Ok("[]")),
        ]);
        let converter = BatchConverter::new(geocoder, test_config());
        let summary = converter.run(&input, &output)?;

        assert_eq!(summary.total, 2);
        assert_eq!(
            fs::read_to_string(&output)?,
            "Stop Name,Latitude,Longitude\nSM Lanang,7.1,125.6\nAbreeza Mall,,\n"
        );
        Ok(())
    }

    #[test]
    fn test_run_missing_input_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("missing.txt");
        let output = temp_dir.path().join("out.csv");

        let converter = BatchConverter::new(ScriptedGeocoder::new(&[]), test_config());
        assert!(converter.run(&input, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_run_empty_input_writes_header() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("stops.txt");
        let output = temp_dir.path().join("out.csv");
        fs::write(&input, "\n\n")?;

        let converter = BatchConverter::new(ScriptedGeocoder::new(&[]), test_config());
        let summary = converter.run(&input, &output)?;

        assert_eq!(summary, BatchSummary::default());
        assert_eq!(
            fs::read_to_string(&output)?,
            "Stop Name,Latitude,Longitude\n"
        );
        Ok(())
    }
}
