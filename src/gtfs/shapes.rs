//! Grouping of shapes by canonical route and longest-shape selection.

use std::collections::HashMap;

use crate::gtfs::reader::ShapePoint;

/// A `(longitude, latitude)` pair as written to GeoJSON.
pub type Coord = [f64; 2];

/// The representative geometry of one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub route_id: String,
    pub coordinates: Vec<Coord>,
}

#[derive(Debug, Default)]
struct RouteEntry {
    route_id: String,
    shapes: Vec<(String, Vec<Coord>)>,
}

/// Every shape seen so far, grouped by canonical route id.
///
/// Routes and the shapes within a route keep first-seen order. Re-inserting
/// a shape id under the same route replaces its coordinates in place.
#[derive(Debug, Default)]
pub struct RouteShapes {
    routes: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl RouteShapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts `points` by sequence and files them under `route_id`.
    ///
    /// The sort is stable, so points sharing a sequence number keep their
    /// file order.
    pub fn insert(&mut self, route_id: &str, shape_id: &str, mut points: Vec<ShapePoint>) {
        points.sort_by_key(|p| p.sequence);
        let coords: Vec<Coord> = points.iter().map(|p| [p.lon, p.lat]).collect();

        let idx = match self.index.get(route_id) {
            Some(&idx) => idx,
            None => {
                self.routes.push(RouteEntry {
                    route_id: route_id.to_string(),
                    shapes: Vec::new(),
                });
                self.index.insert(route_id.to_string(), self.routes.len() - 1);
                self.routes.len() - 1
            }
        };

        let entry = &mut self.routes[idx];
        match entry.shapes.iter_mut().find(|(id, _)| id == shape_id) {
            Some((_, existing)) => *existing = coords,
            None => entry.shapes.push((shape_id.to_string(), coords)),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Picks the shape with the most points for every route.
    ///
    /// Ties go to the shape seen first.
    pub fn longest(&self) -> Vec<RouteGeometry> {
        self.routes
            .iter()
            .filter_map(|entry| {
                let mut best: Option<&Vec<Coord>> = None;
                for (_, coords) in &entry.shapes {
                    if best.is_none_or(|b| coords.len() > b.len()) {
                        best = Some(coords);
                    }
                }

                best.map(|coords| RouteGeometry {
                    route_id: entry.route_id.clone(),
                    coordinates: coords.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize, tag: f64) -> Vec<ShapePoint> {
        (0..n)
            .map(|i| ShapePoint {
                sequence: i as i64,
                lon: tag,
                lat: i as f64,
            })
            .collect()
    }

    #[test]
    fn test_longest_shape_wins() {
        let mut shapes = RouteShapes::new();
        shapes.insert("Q6", "A", points(3, 1.0));
        shapes.insert("Q6", "B", points(5, 2.0));

        let routes = shapes.longest();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route_id, "Q6");
        assert_eq!(routes[0].coordinates.len(), 5);
        assert!(routes[0].coordinates.iter().all(|c| c[0] == 2.0));
        let lats: Vec<f64> = routes[0].coordinates.iter().map(|c| c[1]).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let mut shapes = RouteShapes::new();
        shapes.insert("M15", "first", points(4, 1.0));
        shapes.insert("M15", "second", points(4, 2.0));

        let routes = shapes.longest();
        assert_eq!(routes[0].coordinates[0][0], 1.0);
    }

    #[test]
    fn test_points_sorted_by_sequence() {
        let mut shapes = RouteShapes::new();
        let unordered = vec![
            ShapePoint { sequence: 3, lon: -73.3, lat: 40.3 },
            ShapePoint { sequence: 1, lon: -73.1, lat: 40.1 },
            ShapePoint { sequence: 2, lon: -73.2, lat: 40.2 },
        ];
        shapes.insert("B46", "S", unordered);

        let routes = shapes.longest();
        assert_eq!(
            routes[0].coordinates,
            vec![[-73.1, 40.1], [-73.2, 40.2], [-73.3, 40.3]]
        );
    }

    #[test]
    fn test_routes_keep_first_seen_order() {
        let mut shapes = RouteShapes::new();
        shapes.insert("Bx12", "a", points(1, 0.0));
        shapes.insert("M15", "b", points(1, 0.0));
        shapes.insert("Bx12", "c", points(2, 0.0));

        let ids: Vec<String> = shapes.longest().into_iter().map(|r| r.route_id).collect();
        assert_eq!(ids, vec!["Bx12", "M15"]);
        assert_eq!(shapes.route_count(), 2);
    }

    #[test]
    fn test_reinserted_shape_replaces_coordinates() {
        let mut shapes = RouteShapes::new();
        shapes.insert("S54", "x", points(6, 1.0));
        shapes.insert("S54", "x", points(2, 9.0));

        let routes = shapes.longest();
        assert_eq!(routes[0].coordinates.len(), 2);
        assert_eq!(routes[0].coordinates[0][0], 9.0);
    }
}
