//! Web presentation layer.
//!
//! Serves the server-rendered playground page plus a small JSON API over the
//! same operations. No state is kept between requests: the selection and the
//! query text travel in the request itself.

pub mod api;
pub mod handlers;
pub mod page;
pub mod server;

pub use page::{PageRenderer, PageView, QueryForm, Selection, build_page};
pub use server::HttpServer;

use crate::config::Config;
use crate::db::{DatabaseDirectory, QueryExecutor};
use crate::error::PlaygroundResult;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Read-only state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: DatabaseDirectory,
    pub executor: QueryExecutor,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: &Config) -> PlaygroundResult<Self> {
        Self::from_parts(
            DatabaseDirectory::new(&config.databases_dir),
            QueryExecutor::with_timeout(config.query_timeout_duration()),
        )
    }

    pub fn from_parts(directory: DatabaseDirectory, executor: QueryExecutor) -> PlaygroundResult<Self> {
        Ok(Self {
            directory,
            executor,
            renderer: Arc::new(PageRenderer::new()?),
        })
    }
}

/// Build the router for the page, the JSON API and the health check.
pub fn playground_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::show_page).post(handlers::submit_query))
        .route("/health", get(handlers::health))
        .route("/api/databases", get(api::list_databases))
        .route("/api/databases/{db}/tables", get(api::list_tables))
        .route(
            "/api/databases/{db}/tables/{table}/sample",
            get(api::sample_table),
        )
        .route("/api/databases/{db}/query", post(api::run_query))
        .with_state(state)
}
