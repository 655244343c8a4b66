use std::io;

use crate::road::Road;

use super::{read_to_string, write_string};

/// Reads a road, its lane sections and all profiles from JSON.
///
/// Profiles are re-validated on load: duplicate record offsets and
/// non-contiguous lane sections are rejected as `InvalidData`.
pub fn read_road_json(path: &str) -> io::Result<Road> {
    let contents = read_to_string(path)?;
    let road: Road = serde_json::from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(road)
}

pub fn write_road_json(path: &str, road: &Road) -> io::Result<()> {
    let json = serde_json::to_string_pretty(road).map_err(io::Error::other)?;
    write_string(path, &json)
}
