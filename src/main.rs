//! CLI entry point for the NYC bus feed tools.
//!
//! Provides subcommands for flattening GTFS shapes into `routes.geojson`,
//! taking a live vehicle snapshot from MTA Bus Time, and classifying raw
//! route codes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nyc_bus_feeds::config::FeedConfig;
use nyc_bus_feeds::gtfs::{DEFAULT_FOLDERS, extract_routes};
use nyc_bus_feeds::live::LiveFeed;
use nyc_bus_feeds::output::write_geojson;
use nyc_bus_feeds::routes::{Classifier, classify_route, normalize_route_id};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "nyc_bus_feeds")]
#[command(about = "Tools for NYC bus route shapes and live positions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten GTFS trips and shapes into one GeoJSON line per route
    Shapes {
        /// GeoJSON file to write
        #[arg(short, long, default_value = "routes.geojson")]
        output: PathBuf,

        /// GTFS folder to read (repeatable); defaults to the six borough folders
        #[arg(short, long = "folder", value_name = "DIR")]
        folders: Vec<PathBuf>,
    },
    /// Fetch one live vehicle snapshot from MTA Bus Time
    Live {
        /// Write the response body here instead of printing the envelope
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Classification strategy: "route" or "agency" (overrides BUS_CLASSIFIER)
        #[arg(short, long)]
        classifier: Option<Classifier>,
    },
    /// Print the canonical id and borough for raw route codes
    Classify {
        #[arg(value_name = "ROUTE", required = true)]
        routes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nyc_bus_feeds.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nyc_bus_feeds.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shapes { output, folders } => {
            let folders = if folders.is_empty() {
                DEFAULT_FOLDERS.iter().map(PathBuf::from).collect()
            } else {
                folders
            };

            let routes = extract_routes(&folders)?;
            write_geojson(&output, &routes)?;
        }
        Commands::Live { output, classifier } => {
            let mut config = FeedConfig::from_env();
            if let Some(classifier) = classifier {
                config.classifier = classifier;
            }

            let feed = LiveFeed::from_config(config)?;
            let response = feed.handle().await;

            match output {
                Some(path) if response.is_success() => {
                    std::fs::write(&path, &response.body)?;
                    info!(path = %path.display(), "Snapshot written");
                }
                _ => println!("{}", serde_json::to_string_pretty(&response)?),
            }

            if !response.is_success() {
                error!(status = response.status_code, "Live snapshot returned an error");
                anyhow::bail!("live snapshot failed with status {}", response.status_code);
            }
        }
        Commands::Classify { routes } => {
            for raw in &routes {
                let canonical = normalize_route_id(raw);
                let borough = classify_route(canonical.as_deref().unwrap_or_default());
                println!(
                    "{}\t{}\t{}\t{}",
                    raw,
                    canonical.as_deref().unwrap_or("-"),
                    borough,
                    borough.color()
                );
            }
        }
    }

    Ok(())
}
