//! API Gateway proxy response envelope returned by the live handler.

use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON document, already serialized.
    pub body: String,
}

impl LambdaResponse {
    /// A JSON response. Falls back to a 500 error if `value` cannot be serialized.
    pub fn json(status_code: u16, value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::with_body(status_code, body),
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    /// A `{"error": message}` response.
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::with_body(status_code, json!({ "error": message }).to_string())
    }

    fn with_body(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
