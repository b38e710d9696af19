//! One-shot live vehicle snapshot: fetch, decode, reduce.

use tracing::{error, info};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::response::LambdaResponse;
use crate::routes::Classifier;
use crate::siri::SiriResponse;
use crate::snapshot::{SnapshotPayload, reduce_activities};

/// Query parameter Bus Time reads the API key from.
pub const API_KEY_PARAM: &str = "key";

pub struct LiveFeed<C> {
    config: FeedConfig,
    client: UrlParam<C>,
}

impl LiveFeed<BasicClient> {
    /// A feed backed by a plain HTTP client bounded by `config.timeout`.
    pub fn from_config(config: FeedConfig) -> Result<Self, FeedError> {
        let client = BasicClient::with_timeout(config.timeout)?;
        Ok(Self::new(config, client))
    }
}

impl<C: HttpClient> LiveFeed<C> {
    pub fn new(config: FeedConfig, client: C) -> Self {
        let key = config.api_key.clone().unwrap_or_default();
        Self {
            client: UrlParam::new(client, API_KEY_PARAM, key),
            config,
        }
    }

    /// Fetches and reduces one snapshot.
    ///
    /// Without an API key this fails before any request is made.
    #[tracing::instrument(skip(self), fields(classifier = ?self.config.classifier))]
    pub async fn snapshot(&self) -> Result<SnapshotPayload, FeedError> {
        if self.config.api_key.is_none() {
            return Err(FeedError::MissingApiKey);
        }

        let url = self.config.request_url();
        info!(url = %url, "Requesting vehicle monitoring feed");
        let bytes = fetch_bytes(&self.client, &url).await?;

        decode_snapshot(&bytes, self.config.classifier)
    }

    /// Runs [`LiveFeed::snapshot`] and wraps the outcome in a response
    /// envelope. Never fails.
    pub async fn handle(&self) -> LambdaResponse {
        match self.snapshot().await {
            Ok(payload) => LambdaResponse::json(200, &payload),
            Err(e) => {
                let status = e.status_code();
                error!(error = %e, status, "Live snapshot failed");
                LambdaResponse::error(status, &e.to_string())
            }
        }
    }
}

/// Decodes a SIRI vehicle-monitoring body and reduces it.
pub fn decode_snapshot(bytes: &[u8], classifier: Classifier) -> Result<SnapshotPayload, FeedError> {
    let response: SiriResponse = serde_json::from_slice(bytes)?;
    let activities = response.into_vehicle_activities().ok_or(FeedError::NoDelivery)?;
    info!(vehicles = activities.len(), "Processing vehicles");

    let payload = reduce_activities(&activities, classifier);
    info!(buses = payload.total_count, "Snapshot reduced");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts requests and forwards them to a real client.
    struct CountingClient {
        calls: AtomicUsize,
        inner: BasicClient,
    }

    impl CountingClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                inner: BasicClient::with_timeout(Duration::from_secs(2)).unwrap(),
            }
        }
    }

    #[async_trait]
    impl HttpClient for CountingClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.execute(req).await
        }
    }

    /// Answers every request with a fixed status and body, recording the URL.
    struct StaticClient {
        status: u16,
        body: Vec<u8>,
        last_url: Mutex<Option<String>>,
    }

    impl StaticClient {
        fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
            Self {
                status,
                body: body.into(),
                last_url: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl HttpClient for StaticClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.last_url.lock().unwrap() = Some(req.url().to_string());
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    fn unreachable_config() -> FeedConfig {
        FeedConfig {
            endpoint: "http://127.0.0.1:1/vehicle-monitoring.json".to_string(),
            timeout: Duration::from_secs(2),
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let feed = LiveFeed::new(unreachable_config(), CountingClient::new());

        let resp = feed.handle().await;

        assert_eq!(resp.status_code, 500);
        assert_eq!(resp.body, r#"{"error":"API key not configured"}"#);
        assert_eq!(feed.client.inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_failure_is_structured() {
        let feed = LiveFeed::new(
            unreachable_config().with_api_key("test-key"),
            CountingClient::new(),
        );

        let resp = feed.handle().await;

        assert_eq!(resp.status_code, 502);
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Network error"));
        assert_eq!(feed.client.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_status_is_structured() {
        let feed = LiveFeed::new(
            unreachable_config().with_api_key("test-key"),
            StaticClient::new(403, "Forbidden"),
        );

        let resp = feed.handle().await;

        assert_eq!(resp.status_code, 502);
        assert_eq!(resp.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(resp.body, r#"{"error":"Upstream returned status 403: Forbidden"}"#);
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/vehicle_monitoring.json");
        let feed = LiveFeed::new(
            unreachable_config().with_api_key("test-key"),
            StaticClient::new(200, std::fs::read(fixture).unwrap()),
        );

        let resp = feed.handle().await;

        assert_eq!(resp.status_code, 200);
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body["total_count"], 4);
        assert_eq!(body["buses"][0]["vehicle_id"], "6027");

        let url = feed.client.inner.last_url.lock().unwrap().clone().unwrap();
        assert!(url.contains("key=test-key"));
        assert!(url.contains("version=2"));
        assert!(url.contains("VehicleMonitoringDetailLevel=calls"));
    }

    #[test]
    fn test_decode_snapshot_malformed() {
        let err = decode_snapshot(b"<html>busy</html>", Classifier::Route).unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
    }

    #[test]
    fn test_decode_snapshot_no_delivery() {
        let body = br#"{"Siri":{"ServiceDelivery":{"VehicleMonitoringDelivery":[]}}}"#;
        let err = decode_snapshot(body, Classifier::Route).unwrap_err();
        assert!(matches!(err, FeedError::NoDelivery));
    }

    #[test]
    fn test_decode_snapshot_empty_activity() {
        let body = br#"{"Siri":{"ServiceDelivery":{"VehicleMonitoringDelivery":[{}]}}}"#;
        let payload = decode_snapshot(body, Classifier::Route).unwrap();
        assert_eq!(payload.total_count, 0);
        assert!(payload.borough_counts.is_empty());
    }
}
