//! One-interaction database session.
//!
//! Each interaction opens its own connection to the selected file and closes it
//! before responding. Callers close the session on every path, including after
//! an error from the work done in between.

use crate::error::{PlaygroundError, PlaygroundResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

pub struct Session {
    conn: SqliteConnection,
    path: PathBuf,
    opened_at: Instant,
}

impl Session {
    /// Open a connection to an existing database file.
    ///
    /// The file is never created; a missing or unreadable file fails here, a
    /// file that is not a database fails on the first query.
    pub async fn open(path: &Path) -> PlaygroundResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);

        let conn = options.connect().await.map_err(|e| {
            PlaygroundError::connection(format!("cannot open '{}': {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Opened database session");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            opened_at: Instant::now(),
        })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Close the connection. Failures are logged; the interaction is over
    /// either way.
    pub async fn close(self) {
        let elapsed_ms = self.opened_at.elapsed().as_millis() as u64;
        match self.conn.close().await {
            Ok(()) => debug!(path = %self.path.display(), elapsed_ms, "Closed database session"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to close database session cleanly"
            ),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
