//! Output formatting and persistence.
//!
//! Route geometries are written as a GeoJSON `FeatureCollection`.

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use std::path::Path;
use tracing::info;

use crate::gtfs::RouteGeometry;

/// Builds one `LineString` feature per route, carrying `route_id` as its only property.
pub fn feature_collection(routes: &[RouteGeometry]) -> FeatureCollection {
    let features = routes
        .iter()
        .map(|route| {
            let mut properties = JsonObject::new();
            properties.insert("route_id".to_string(), route.route_id.clone().into());

            let line = route.coordinates.iter().map(|c| c.to_vec()).collect();

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Writes the route geometries to `path` and logs a short summary.
pub fn write_geojson(path: &Path, routes: &[RouteGeometry]) -> Result<()> {
    let collection = feature_collection(routes);
    let body = serde_json::to_string(&collection)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;

    let mut sample: Vec<&str> = routes.iter().map(|r| r.route_id.as_str()).collect();
    sample.sort_unstable();
    sample.truncate(20);

    info!(
        routes = routes.len(),
        path = %path.display(),
        sample = ?sample,
        "Route geometries written"
    );
    Ok(())
}
