//! Live feed configuration.
//!
//! Read once from the environment at start-up and handed to
//! [`LiveFeed`](crate::live::LiveFeed), so nothing reads the environment
//! mid-request.

use std::time::Duration;
use tracing::warn;

use crate::routes::Classifier;

pub const DEFAULT_ENDPOINT: &str = "https://bustime.mta.info/api/siri/vehicle-monitoring.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Bus Time API key. `None` fails every request before any network call.
    pub api_key: Option<String>,
    pub endpoint: String,
    /// SIRI protocol version sent as `version`.
    pub version: String,
    /// Sent as `VehicleMonitoringDetailLevel`; `calls` includes onward calls.
    pub detail_level: String,
    pub timeout: Duration,
    pub classifier: Classifier,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            version: "2".to_string(),
            detail_level: "calls".to_string(),
            timeout: DEFAULT_TIMEOUT,
            classifier: Classifier::default(),
        }
    }
}

impl FeedConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds a config from `MTA_API_KEY`, `MTA_BUSTIME_URL`,
    /// `MTA_TIMEOUT_SECS` and `BUS_CLASSIFIER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`FeedConfig::from_env`] but reading variables through `lookup`.
    ///
    /// Blank values count as unset. Unparsable optional values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.api_key = get("MTA_API_KEY");

        if let Some(endpoint) = get("MTA_BUSTIME_URL") {
            config.endpoint = endpoint;
        }

        if let Some(raw) = get("MTA_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid MTA_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = get("BUS_CLASSIFIER") {
            match raw.parse::<Classifier>() {
                Ok(classifier) => config.classifier = classifier,
                Err(e) => warn!(error = %e, "Ignoring invalid BUS_CLASSIFIER"),
            }
        }

        config
    }

    /// The endpoint with the protocol and detail-level parameters applied.
    ///
    /// The API key is added separately by [`UrlParam`](crate::fetch::auth::UrlParam)
    /// so it never appears in logged URLs.
    pub fn request_url(&self) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}version={}&VehicleMonitoringDetailLevel={}",
            self.endpoint, sep, self.version, self.detail_level
        )
    }
}
