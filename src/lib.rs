//! SQL Playground Library
//!
//! Browse the SQLite database files in a local folder, preview table rows and
//! run ad-hoc SQL against the selected database through a server-rendered web
//! page or a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod web;

pub use config::Config;
pub use error::{PlaygroundError, PlaygroundResult};
pub use web::{AppState, HttpServer, playground_router};
