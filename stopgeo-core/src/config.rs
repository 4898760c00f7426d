use std::time::Duration;

/// Input file read when no path is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "stops.txt";

/// Output file written when no path is given on the command line
pub const DEFAULT_OUTPUT_FILE: &str = "stops_with_coordinates.csv";

/// Nominatim forward search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Appended to every place name so lookups stay inside the target city
pub const DEFAULT_REGION_SUFFIX: &str = ", Davao City, Philippines";

/// Nominatim's usage policy requires an identifying User-Agent
pub const DEFAULT_USER_AGENT: &str = "DavaoTransportApp/1.0";

/// Configuration options for a geocoding run
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Search endpoint that answers `q`/`format`/`limit`/`addressdetails` queries
    pub endpoint: String,
    /// Region qualifier appended to each place name
    pub region_suffix: String,
    /// Sent as the User-Agent header on every request
    pub user_agent: String,
    /// Maximum number of candidates requested per place (only the first is used)
    pub result_limit: u32,
    /// Pause after every item, including failed ones (Nominatim allows 1 request/second)
    pub request_delay: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region_suffix: DEFAULT_REGION_SUFFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            result_limit: 1,
            request_delay: Duration::from_secs(1),
            // Same as reqwest's own default for blocking clients
            request_timeout: Duration::from_secs(30),
        }
    }
}
