mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::FeedError;
use tracing::info;

/// Issues a single GET and returns the body of a 2xx response.
///
/// Non-2xx statuses become [`FeedError::Status`] carrying the response text.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, FeedError> {
    let url = url
        .parse::<reqwest::Url>()
        .map_err(|e| FeedError::InvalidUrl(format!("{url}: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    info!(status = status.as_u16(), "Got response");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FeedError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(resp.bytes().await?.to_vec())
}
