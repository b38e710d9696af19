//! Reduction of raw vehicle activities into the client payload.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::routes::{Borough, Classifier};
use crate::siri::{VehicleActivity, text_value};

/// Agency prefixes removed from the front of vehicle references.
static VEHICLE_PREFIXES: &[&str] = &["MTA NYCT_", "MTABC_", "MTA QVC_", "MTA BRKLM_", "MTA SI_"];

/// Number of onward calls reported per bus.
pub const NEXT_STOP_LIMIT: usize = 3;

const UNKNOWN: &str = "Unknown";

/// One bus as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusInfo {
    pub vehicle_id: String,
    pub route: String,
    pub latitude: f64,
    pub longitude: f64,
    pub destination: String,
    pub next_stops: Vec<String>,
    pub borough: Borough,
    pub color: &'static str,
}

/// The response body of a successful live snapshot.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SnapshotPayload {
    pub buses: Vec<BusInfo>,
    pub total_count: usize,
    pub borough_counts: BTreeMap<String, usize>,
    /// Keyed `"<borough>:<route>"`.
    pub route_counts: BTreeMap<String, usize>,
}

/// Strips a known agency prefix from a vehicle reference.
pub fn clean_vehicle_id(vehicle_ref: &str) -> &str {
    VEHICLE_PREFIXES
        .iter()
        .find_map(|prefix| vehicle_ref.strip_prefix(prefix))
        .unwrap_or(vehicle_ref)
}

/// Builds one [`BusInfo`], or `None` when the vehicle has no usable position.
///
/// A zero coordinate counts as missing.
pub fn bus_info(activity: &VehicleActivity, classifier: Classifier) -> Option<BusInfo> {
    let journey = &activity.MonitoredVehicleJourney;
    let location = journey.VehicleLocation.as_ref()?;
    let latitude = location.Latitude.filter(|v| *v != 0.0)?;
    let longitude = location.Longitude.filter(|v| *v != 0.0)?;

    let vehicle_ref = journey.VehicleRef.as_deref().unwrap_or(UNKNOWN);
    let route = text_value(journey.PublishedLineName.as_ref()).unwrap_or(UNKNOWN);
    let destination = text_value(journey.DestinationName.as_ref()).unwrap_or(UNKNOWN);

    let next_stops = journey
        .OnwardCalls
        .as_ref()
        .map(|calls| {
            calls
                .OnwardCall
                .iter()
                .take(NEXT_STOP_LIMIT)
                .map(|call| text_value(call.StopPointName.as_ref()).unwrap_or(UNKNOWN).to_string())
                .collect()
        })
        .unwrap_or_default();

    let borough = classifier.classify(route, vehicle_ref);

    Some(BusInfo {
        vehicle_id: clean_vehicle_id(vehicle_ref).to_string(),
        route: route.to_string(),
        latitude,
        longitude,
        destination: destination.to_string(),
        next_stops,
        borough,
        color: borough.color(),
    })
}

/// Reduces all activities into the enriched bus list and its tallies.
///
/// Vehicles without a position are left out of every field.
pub fn reduce_activities(activities: &[VehicleActivity], classifier: Classifier) -> SnapshotPayload {
    let mut payload = SnapshotPayload::default();

    for bus in activities.iter().filter_map(|a| bus_info(a, classifier)) {
        *payload
            .borough_counts
            .entry(bus.borough.name().to_string())
            .or_default() += 1;
        *payload
            .route_counts
            .entry(format!("{}:{}", bus.borough, bus.route))
            .or_default() += 1;
        payload.buses.push(bus);
    }

    payload.total_count = payload.buses.len();
    payload
}
