//! Configuration handling for the SQL playground.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASES_DIR: &str = "databases";
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8501;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the SQL playground server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sql-playground",
    about = "Browse SQLite databases in a local folder and run ad-hoc SQL through a web UI",
    version,
    author
)]
pub struct Config {
    /// Folder scanned for `.db` files. Created on startup if missing.
    #[arg(
        short = 'd',
        long = "databases-dir",
        value_name = "DIR",
        default_value = DEFAULT_DATABASES_DIR,
        env = "PLAYGROUND_DATABASES_DIR"
    )]
    pub databases_dir: PathBuf,

    /// HTTP host to bind to
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "PLAYGROUND_HOST")]
    pub host: String,

    /// HTTP port to bind to
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "PLAYGROUND_PORT"
    )]
    pub port: u16,

    /// Query timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "PLAYGROUND_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "PLAYGROUND_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "PLAYGROUND_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            databases_dir: PathBuf::from(DEFAULT_DATABASES_DIR),
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }

    /// Validate option combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.query_timeout == 0 {
            return Err("query_timeout must be greater than 0".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("host cannot be empty".to_string());
        }
        Ok(())
    }

    /// Get the query timeout as a Duration.
    pub fn query_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
