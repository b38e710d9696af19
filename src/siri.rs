//! Typed view of a SIRI vehicle-monitoring JSON response.
//!
//! Only the fields the snapshot reducer reads are modelled. The envelope is
//! decoded strictly, but each activity is kept as raw JSON and converted on
//! its own by [`SiriResponse::into_vehicle_activities`], so one malformed
//! vehicle is dropped without failing the rest.

#![allow(non_snake_case)]

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct SiriResponse {
    pub Siri: Siri,
}

#[derive(Debug, Default, Deserialize)]
pub struct Siri {
    pub ServiceDelivery: ServiceDelivery,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceDelivery {
    #[serde(default)]
    pub VehicleMonitoringDelivery: Vec<VehicleMonitoringDelivery>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleMonitoringDelivery {
    #[serde(default)]
    pub VehicleActivity: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleActivity {
    #[serde(default)]
    pub MonitoredVehicleJourney: MonitoredVehicleJourney,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonitoredVehicleJourney {
    pub VehicleRef: Option<String>,
    /// A string in SIRI v1, a one-element list in v2.
    pub PublishedLineName: Option<Value>,
    pub DestinationName: Option<Value>,
    pub VehicleLocation: Option<VehicleLocation>,
    pub OnwardCalls: Option<OnwardCalls>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VehicleLocation {
    pub Latitude: Option<f64>,
    pub Longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OnwardCalls {
    pub OnwardCall: Vec<OnwardCall>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OnwardCall {
    pub StopPointName: Option<Value>,
}

impl SiriResponse {
    /// Activities of the first delivery, or `None` when the response has no delivery.
    ///
    /// Activities that do not match the expected shape are logged and skipped.
    pub fn into_vehicle_activities(self) -> Option<Vec<VehicleActivity>> {
        let delivery = self.Siri.ServiceDelivery.VehicleMonitoringDelivery.into_iter().next()?;
        let total = delivery.VehicleActivity.len();

        let activities: Vec<VehicleActivity> = delivery
            .VehicleActivity
            .into_iter()
            .enumerate()
            .filter_map(|(idx, raw)| match serde_json::from_value(raw) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    debug!(index = idx, error = %e, "Skipping malformed vehicle activity");
                    None
                }
            })
            .collect();

        if activities.len() < total {
            debug!(skipped = total - activities.len(), "Dropped malformed vehicle activities");
        }
        Some(activities)
    }
}

/// Reads a name field that may be a bare string or a list of strings.
///
/// A list yields its first element. Absent fields, empty lists and any
/// other JSON type yield `None`.
pub fn text_value(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_value_variants() {
        assert_eq!(text_value(Some(&json!("M15"))), Some("M15"));
        assert_eq!(text_value(Some(&json!(["Bx12", "ignored"]))), Some("Bx12"));
        assert_eq!(text_value(Some(&json!([]))), None);
        assert_eq!(text_value(Some(&json!(42))), None);
        assert_eq!(text_value(Some(&json!({"value": "M15"}))), None);
        assert_eq!(text_value(None), None);
    }

    #[test]
    fn test_decode_sparse_activity() {
        let body = json!({
            "Siri": {
                "ServiceDelivery": {
                    "VehicleMonitoringDelivery": [{
                        "VehicleActivity": [
                            { "MonitoredVehicleJourney": { "VehicleRef": "MTA NYCT_1" } },
                            {}
                        ]
                    }]
                }
            }
        });

        let response: SiriResponse = serde_json::from_value(body).unwrap();
        let activities = response.into_vehicle_activities().unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(
            activities[0].MonitoredVehicleJourney.VehicleRef.as_deref(),
            Some("MTA NYCT_1")
        );
        assert!(activities[1].MonitoredVehicleJourney.VehicleLocation.is_none());
    }

    #[test]
    fn test_missing_delivery() {
        let body = json!({ "Siri": { "ServiceDelivery": { "VehicleMonitoringDelivery": [] } } });
        let response: SiriResponse = serde_json::from_value(body).unwrap();
        assert!(response.into_vehicle_activities().is_none());
    }

    #[test]
    fn test_malformed_activity_is_skipped() {
        let body = json!({
            "Siri": {
                "ServiceDelivery": {
                    "VehicleMonitoringDelivery": [{
                        "VehicleActivity": [
                            { "MonitoredVehicleJourney": { "VehicleRef": 1234 } },
                            { "MonitoredVehicleJourney": { "VehicleRef": "MTABC_5301" } },
                            "not an object"
                        ]
                    }]
                }
            }
        });

        let response: SiriResponse = serde_json::from_value(body).unwrap();
        let activities = response.into_vehicle_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(
            activities[0].MonitoredVehicleJourney.VehicleRef.as_deref(),
            Some("MTABC_5301")
        );
    }

    #[test]
    fn test_missing_siri_root_is_error() {
        let result: Result<SiriResponse, _> = serde_json::from_value(json!({ "error": "nope" }));
        assert!(result.is_err());
    }
}
