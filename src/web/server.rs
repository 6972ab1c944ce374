//! HTTP server for the playground.

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::web::{AppState, playground_router};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// HTTP server serving the page and the JSON API.
pub struct HttpServer {
    state: AppState,
    /// Host to bind to
    host: String,
    /// Port to bind to
    port: u16,
}

impl HttpServer {
    /// Create a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `state` - Shared handler state
    /// * `host` - Host address to bind to
    /// * `port` - Port to bind to
    pub fn new(state: AppState, host: impl Into<String>, port: u16) -> Self {
        Self {
            state,
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until SIGINT or SIGTERM. In-flight requests are allowed to finish.
    pub async fn run(self) -> PlaygroundResult<()> {
        let bind_addr = self.bind_addr();
        let app = playground_router(self.state);

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            PlaygroundError::internal(format!("Failed to bind to {}: {}", bind_addr, e))
        })?;

        info!(address = %bind_addr, "SQL Playground listening on http://{}", bind_addr);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_signal())
            .await;

        match result {
            Ok(()) => {
                info!("HTTP server stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "HTTP server error");
                Err(PlaygroundError::internal(format!("HTTP server error: {}", e)))
            }
        }
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
