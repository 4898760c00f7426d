use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use stopgeo_core::{
    GeocodeConfig, DEFAULT_ENDPOINT, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE,
    DEFAULT_REGION_SUFFIX, DEFAULT_USER_AGENT,
};

/// Look up coordinates for a list of stop names and save them as CSV
#[derive(Parser, Debug)]
#[command(name = "stopgeo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Geocodes stop names via OpenStreetMap Nominatim", long_about = None)]
pub struct Args {
    /// Text file with one stop name per line
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// CSV file to write (overwritten if it exists)
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Region qualifier appended to every stop name
    #[arg(long = "region", default_value = DEFAULT_REGION_SUFFIX)]
    pub region: String,

    /// Geocoding search endpoint
    #[arg(long = "endpoint", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User-Agent sent with every request
    #[arg(long = "user-agent", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pause between requests in milliseconds
    #[arg(long = "delay-ms", default_value_t = 1000)]
    pub delay_ms: u64,
}

impl Args {
    pub fn to_config(&self) -> GeocodeConfig {
        GeocodeConfig {
            endpoint: self.endpoint.clone(),
            region_suffix: self.region.clone(),
            user_agent: self.user_agent.clone(),
            request_delay: Duration::from_millis(self.delay_ms),
            ..GeocodeConfig::default()
        }
    }
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
