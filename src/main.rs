//! SQL Playground - Main entry point.
//!
//! Serves a web page for browsing the SQLite files in a local folder and
//! running ad-hoc SQL against them.

use sql_playground::config::Config;
use sql_playground::db::DatabaseDirectory;
use sql_playground::web::{AppState, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    init_tracing(&config);

    if let Err(msg) = config.validate() {
        eprintln!("Error: {}", msg);
        eprintln!();
        eprintln!("Usage: sql-playground --databases-dir <folder> [--port <port>]");
        std::process::exit(1);
    }

    info!(
        databases_dir = %config.databases_dir.display(),
        query_timeout_secs = config.query_timeout,
        "Starting SQL Playground v{}",
        env!("CARGO_PKG_VERSION")
    );

    // The folder is created on startup so the page can explain it is empty
    DatabaseDirectory::new(&config.databases_dir)
        .ensure_exists()
        .await?;

    let state = AppState::new(&config)?;
    let server = HttpServer::new(state, &config.host, config.port);

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
