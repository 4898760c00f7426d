use crate::config::GeocodeConfig;
use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;

/// Latitude/longitude exactly as the service returned them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

/// What happened when looking up a single place name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    /// First candidate's coordinates
    Found(Coordinates),
    /// The service answered with an empty candidate list (or another empty JSON value)
    NotFound,
    /// Request or response handling failed; holds the error detail
    Failed(String),
}

/// The fields read from a Nominatim search candidate
#[derive(Debug, Deserialize)]
struct SearchCandidate {
    lat: Option<Value>,
    lon: Option<Value>,
}

/// A forward geocoding service that returns the raw JSON body for a query
pub trait Geocoder {
    fn search(&self, query: &str) -> Result<String>;
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Result<String>,
{
    fn search(&self, query: &str) -> Result<String> {
        self(query)
    }
}

/// Blocking client for the Nominatim `/search` endpoint
pub struct NominatimClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    user_agent: String,
    result_limit: u32,
}

impl NominatimClient {
    pub fn new(config: &GeocodeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            result_limit: config.result_limit,
        })
    }

    /// Build the GET request for a query without sending it
    pub fn build_request(&self, query: &str) -> Result<reqwest::blocking::Request> {
        let limit = self.result_limit.to_string();

        self.client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "0"),
            ])
            .header(USER_AGENT, &self.user_agent)
            .build()
            .context("Failed to build geocoding request")
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Result<String> {
        let request = self.build_request(query)?;
        log::debug!("Geocoding '{}' via {}", query, request.url());

        let response = self
            .client
            .execute(request)
            .context("Failed to send geocoding request")?;

        if !response.status().is_success() {
            anyhow::bail!("Geocoding API returned status: {}", response.status());
        }

        response.text().context("Failed to read geocoding response")
    }
}

/// Append the region qualifier to a place name
pub fn build_query(place: &str, region_suffix: &str) -> String {
    format!("{}{}", place, region_suffix)
}

/// Extract the first candidate's coordinates from a search response body.
///
/// Returns `Ok(None)` for an empty candidate list or any other empty JSON
/// value (`null`, `{}`, `""`, `0`, `false`). Otherwise the body must be a JSON
/// array whose first element carries `lat` and `lon`.
pub fn parse_search_response(body: &str) -> Result<Option<Coordinates>> {
    let value: Value =
        serde_json::from_str(body).context("Failed to parse geocoding response")?;

    if is_empty_response(&value) {
        return Ok(None);
    }

    // Later candidates are never inspected
    let first = value
        .as_array()
        .and_then(|candidates| candidates.first())
        .context("Geocoding response is not a JSON array")?;
    let candidate: SearchCandidate = serde_json::from_value(first.clone())
        .context("Unexpected candidate in geocoding response")?;

    Ok(Some(Coordinates {
        lat: coordinate_field(candidate.lat, "lat")?,
        lon: coordinate_field(candidate.lon, "lon")?,
    }))
}

fn is_empty_response(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn coordinate_field(value: Option<Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(text)) => Ok(text),
        // Nominatim sends strings; tolerate bare numbers from compatible services
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(other) => {
            anyhow::bail!("Unexpected `{}` value in geocoding response: {}", field, other)
        }
        None => anyhow::bail!("Geocoding response is missing `{}`", field),
    }
}

/// Look up one place name. Never fails: errors become `GeocodeOutcome::Failed`.
pub fn geocode_place<G: Geocoder + ?Sized>(
    geocoder: &G,
    place: &str,
    region_suffix: &str,
) -> GeocodeOutcome {
    let query = build_query(place, region_suffix);

    match geocoder
        .search(&query)
        .and_then(|body| parse_search_response(&body))
    {
        Ok(Some(coordinates)) => GeocodeOutcome::Found(coordinates),
        Ok(None) => GeocodeOutcome::NotFound,
        Err(e) => GeocodeOutcome::Failed(format!("{:#}", e)),
    }
}
