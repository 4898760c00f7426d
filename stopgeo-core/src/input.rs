use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads place names from a line-delimited file
pub fn read_place_names(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    let places = parse_place_names(&text);
    log::debug!("Read {} place names from {}", places.len(), path.display());

    Ok(places)
}

/// Splits text into trimmed, non-empty place names, keeping their order
pub fn parse_place_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
