//! Latitude/longitude coordinate-mapping JSON

use crate::error::Result;
use pose6d_core::LatLonTable;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct LatLonFile {
    latitude: Vec<f32>,
    longitude: Vec<f32>,
}

/// Read a per-vertex `{ "latitude": [...], "longitude": [...] }` mapping
pub fn read_latlon_table<P: AsRef<Path>>(path: P) -> Result<LatLonTable> {
    let text = fs::read_to_string(path)?;
    let file: LatLonFile = serde_json::from_str(&text)?;
    Ok(LatLonTable::new(file.latitude, file.longitude)?)
}
