use async_trait::async_trait;
use reqwest::{Request, Response};

/// The single seam between the live feed and the network.
///
/// Wrappers such as [`UrlParam`](super::auth::UrlParam) decorate a request
/// and delegate to an inner client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
