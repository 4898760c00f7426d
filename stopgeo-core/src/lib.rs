use anyhow::Result;
use std::path::Path;

// Internal modules (private)
mod batch;
mod config;
mod geocoding;
mod input;
mod output;

// Re-export public types
pub use batch::{BatchConverter, BatchSummary};
pub use config::{
    GeocodeConfig, DEFAULT_ENDPOINT, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE,
    DEFAULT_REGION_SUFFIX, DEFAULT_USER_AGENT,
};
pub use geocoding::{
    build_query, geocode_place, parse_search_response, Coordinates, GeocodeOutcome, Geocoder,
    NominatimClient,
};
pub use input::{parse_place_names, read_place_names};
pub use output::{CsvSink, GeocodeRecord, HEADER};

/// Geocode every place name in `input` against Nominatim and write the CSV to `output`
pub fn geocode_file(input: &Path, output: &Path, config: GeocodeConfig) -> Result<BatchSummary> {
    let client = NominatimClient::new(&config)?;
    BatchConverter::new(client, config).run(input, output)
}
