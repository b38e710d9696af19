//! Typed rows for `trips.txt` and `shapes.txt`.
//!
//! Files are read whole, a leading UTF-8 byte-order marker is dropped, and
//! every column the pipeline needs is optional so that a missing or empty
//! value skips only the row it belongs to.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// The subset of a `trips.txt` row used to tie shapes to routes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TripRow {
    pub route_id: Option<String>,
    pub shape_id: Option<String>,
}

impl TripRow {
    /// Returns `(shape_id, raw_route_id)` when both are present and non-blank.
    pub fn ids(&self) -> Option<(&str, &str)> {
        let shape_id = self.shape_id.as_deref()?.trim();
        let route_id = self.route_id.as_deref()?.trim();
        if shape_id.is_empty() || route_id.is_empty() {
            return None;
        }
        Some((shape_id, route_id))
    }
}

/// A `shapes.txt` row with its numeric columns still unparsed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShapeRow {
    pub shape_id: Option<String>,
    pub shape_pt_lat: Option<String>,
    pub shape_pt_lon: Option<String>,
    pub shape_pt_sequence: Option<String>,
}

/// A single validated point of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePoint {
    pub sequence: i64,
    pub lon: f64,
    pub lat: f64,
}

impl ShapeRow {
    /// Parses the row into its shape id and point.
    ///
    /// Any missing or non-numeric coordinate or sequence rejects the row, as
    /// does a NaN or infinite coordinate.
    pub fn point(&self) -> Option<(String, ShapePoint)> {
        let shape_id = self.shape_id.as_deref().unwrap_or_default().trim();
        let lat = parse_coord(self.shape_pt_lat.as_deref()?)?;
        let lon = parse_coord(self.shape_pt_lon.as_deref()?)?;
        let sequence = self.shape_pt_sequence.as_deref()?.trim().parse::<i64>().ok()?;

        Some((shape_id.to_string(), ShapePoint { sequence, lon, lat }))
    }
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a headed GTFS table into typed rows.
///
/// Rows that fail to decode are logged and skipped; only I/O failures and a
/// non-UTF-8 file are errors.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => debug!(path = %path.display(), line = line + 2, error = %e, "Skipping undecodable row"),
        }
    }

    Ok(rows)
}
