pub mod config;
pub mod error;
pub mod fetch;
pub mod gtfs;
pub mod live;
pub mod output;
pub mod response;
pub mod routes;
pub mod siri;
pub mod snapshot;

/// Name used for log files and the Lambda function's log target.
pub const APP_NAME: &str = "nyc_bus_feeds";
