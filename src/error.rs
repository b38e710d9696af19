use thiserror::Error;

/// Failures of a live snapshot request.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Malformed response: no vehicle monitoring delivery")]
    NoDelivery,
}

impl FeedError {
    /// HTTP status reported to the caller for this failure.
    ///
    /// Local configuration problems are 500; anything the upstream service
    /// did wrong is 502.
    pub fn status_code(&self) -> u16 {
        match self {
            FeedError::MissingApiKey | FeedError::InvalidUrl(_) => 500,
            FeedError::Http(_)
            | FeedError::Status { .. }
            | FeedError::Malformed(_)
            | FeedError::NoDelivery => 502,
        }
    }
}
