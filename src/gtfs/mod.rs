//! GTFS shape extraction.
//!
//! Reads `trips.txt` and `shapes.txt` from each borough folder, ties shapes to
//! canonical route ids and keeps the longest shape per route.

pub mod reader;
pub mod shapes;

pub use reader::{ShapePoint, ShapeRow, TripRow};
pub use shapes::{Coord, RouteGeometry, RouteShapes};

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::routes::normalize_route_id;

/// Borough folders processed when none are given on the command line.
pub const DEFAULT_FOLDERS: &[&str] = &[
    "bus_routes/gtfs_bronx",
    "bus_routes/gtfs_brooklyn",
    "bus_routes/gtfs_manhattan",
    "bus_routes/gtfs_queens",
    "bus_routes/gtfs_staten_island",
    "bus_routes/gtfs_express",
];

/// Runs every folder through [`load_folder`] and selects one geometry per route.
///
/// Missing folders, missing files and unreadable tables are logged and
/// skipped; the remaining folders still contribute.
#[tracing::instrument(skip_all, fields(folders = folders.len()))]
pub fn extract_routes(folders: &[PathBuf]) -> Result<Vec<RouteGeometry>> {
    let mut route_shapes = RouteShapes::new();

    for folder in folders {
        if !folder.is_dir() {
            warn!(folder = %folder.display(), "Folder not found, skipping");
            continue;
        }

        let trips_path = folder.join("trips.txt");
        let shapes_path = folder.join("shapes.txt");
        if !trips_path.is_file() || !shapes_path.is_file() {
            warn!(folder = %folder.display(), "Missing trips.txt or shapes.txt, skipping");
            continue;
        }

        info!(folder = %folder.display(), "Processing folder");
        if let Err(e) = load_folder(&trips_path, &shapes_path, &mut route_shapes) {
            warn!(folder = %folder.display(), error = %e, "Failed to load folder, skipping");
        }
    }

    info!(routes = route_shapes.route_count(), "Shapes grouped by route");
    Ok(route_shapes.longest())
}

/// Loads one folder's trips and shapes into `route_shapes`.
pub fn load_folder(trips_path: &Path, shapes_path: &Path, route_shapes: &mut RouteShapes) -> Result<()> {
    let trips: Vec<TripRow> = reader::read_table(trips_path)?;
    let shape_to_route = shape_routes(&trips);
    debug!(trips = trips.len(), shapes = shape_to_route.len(), "Trips mapped");

    let rows: Vec<ShapeRow> = reader::read_table(shapes_path)?;
    let mut skipped = 0usize;
    let mut order: Vec<String> = Vec::new();
    let mut points: HashMap<String, Vec<ShapePoint>> = HashMap::new();

    for row in &rows {
        let Some((shape_id, point)) = row.point() else {
            skipped += 1;
            continue;
        };
        points
            .entry(shape_id)
            .or_insert_with_key(|id| {
                order.push(id.clone());
                Vec::new()
            })
            .push(point);
    }

    if skipped > 0 {
        debug!(skipped, path = %shapes_path.display(), "Skipped shape rows with invalid values");
    }

    for shape_id in order {
        let Some(route_id) = shape_to_route.get(&shape_id) else {
            continue;
        };
        if let Some(shape_points) = points.remove(&shape_id) {
            route_shapes.insert(route_id, &shape_id, shape_points);
        }
    }

    Ok(())
}

/// Maps each shape id to the canonical route its trips run on.
///
/// When several trips share a shape the last one wins.
pub fn shape_routes(trips: &[TripRow]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for trip in trips {
        let Some((shape_id, raw_route)) = trip.ids() else {
            continue;
        };
        if let Some(route_id) = normalize_route_id(raw_route) {
            map.insert(shape_id.to_string(), route_id);
        }
    }
    map
}
