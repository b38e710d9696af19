use lambda_runtime::{LambdaEvent, service_fn};
use nyc_bus_feeds::APP_NAME;
use nyc_bus_feeds::config::FeedConfig;
use nyc_bus_feeds::live::LiveFeed;
use nyc_bus_feeds::response::LambdaResponse;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();
    tracing::info!(app = APP_NAME, "Lambda starting");

    // Read once per cold start. A missing key is reported per invocation.
    let feed = LiveFeed::from_config(FeedConfig::from_env())?;
    let feed = &feed;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(feed, event).await
    }))
    .await
}

async fn handler<C: nyc_bus_feeds::fetch::HttpClient>(
    feed: &LiveFeed<C>,
    _event: LambdaEvent<Value>,
) -> Result<LambdaResponse, lambda_runtime::Error> {
    Ok(feed.handle().await)
}
