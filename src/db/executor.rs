//! Query execution engine.
//!
//! This module runs the two kinds of SQL the playground issues:
//! - the fixed, bounded sample query for a catalog table
//! - free-text SQL typed by the user
//!
//! Both are bounded by the configured query timeout. The bound is enforced by
//! the engine itself: a progress handler on the connection interrupts the
//! running statement once the deadline has passed, so an interrupted write is
//! rolled back rather than left running. The connection runs in autocommit
//! mode, so a write statement is committed as soon as it succeeds.

use crate::config::DEFAULT_QUERY_TIMEOUT_SECS;
use crate::db::schema::quote_ident;
use crate::db::statement;
use crate::db::types::{column_names, row_values};
use crate::error::{PlaygroundError, PlaygroundResult};
use crate::models::{QueryOutcome, QueryResult, SAMPLE_ROW_LIMIT};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Statement};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Virtual machine instructions between two deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

/// Query executor that handles database query execution.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    timeout: Duration,
}

impl QueryExecutor {
    /// Create a new query executor with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    /// Create a new query executor with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Fetch up to [`SAMPLE_ROW_LIMIT`] rows of a table.
    ///
    /// The table name should come from the catalog; it is quoted either way.
    /// Column names are reported even when the table is empty.
    pub async fn sample_rows(
        &self,
        conn: &mut SqliteConnection,
        table: &str,
    ) -> PlaygroundResult<QueryResult> {
        let sql = format!(
            "SELECT * FROM {} LIMIT {}",
            quote_ident(table),
            SAMPLE_ROW_LIMIT
        );
        let start = Instant::now();

        let deadline = Deadline::arm(conn, self.timeout).await?;
        let fetched = sqlx::query(&sql).fetch_all(&mut *conn).await;
        deadline.disarm(conn).await;

        let rows = match fetched {
            Ok(rows) => rows,
            Err(_) if deadline.expired() => {
                return Err(PlaygroundError::timeout("sample query", self.timeout.as_secs()));
            }
            Err(e) => return Err(e.into()),
        };

        let columns = match rows.first() {
            Some(first) => column_names(first),
            None => describe_columns(conn, &sql).await?,
        };

        let result = to_result(columns, &rows, start);
        debug!(table = %table, rows = result.row_count(), "Fetched sample rows");
        Ok(result)
    }

    /// Run user-supplied SQL.
    ///
    /// - blank text does nothing
    /// - text starting with `SELECT` is fetched in full
    /// - anything else is executed and committed
    ///
    /// Every engine failure, including the timeout, comes back as
    /// [`PlaygroundError::Query`] carrying the engine's message. A statement
    /// stopped by the timeout is rolled back.
    pub async fn execute_query(
        &self,
        conn: &mut SqliteConnection,
        sql: &str,
    ) -> PlaygroundResult<QueryOutcome> {
        if statement::is_blank(sql) {
            return Ok(QueryOutcome::Skipped);
        }

        let start = Instant::now();
        debug!(sql = %sql, timeout_secs = self.timeout.as_secs(), "Executing query");

        if statement::is_select(sql) {
            let deadline = Deadline::arm(conn, self.timeout).await?;
            let fetched = (&mut *conn).fetch_all(sql).await;
            deadline.disarm(conn).await;

            let rows = fetched.map_err(|e| self.query_error(e, &deadline))?;
            if rows.is_empty() {
                return Ok(QueryOutcome::NoResults);
            }

            let result = to_result(column_names(&rows[0]), &rows, start);
            info!(
                rows = result.row_count(),
                execution_time_ms = result.execution_time_ms,
                "Read query executed"
            );
            return Ok(QueryOutcome::Rows(result));
        }

        let deadline = Deadline::arm(conn, self.timeout).await?;
        let executed = (&mut *conn).execute(sql).await;
        deadline.disarm(conn).await;

        let done = executed.map_err(|e| self.query_error(e, &deadline))?;
        let statement = statement::statement_label(sql);
        let rows_affected = done.rows_affected();
        let execution_time_ms = start.elapsed().as_millis() as u64;
        info!(
            statement = %statement,
            rows_affected,
            execution_time_ms,
            "Write statement committed"
        );

        Ok(QueryOutcome::Committed {
            statement,
            rows_affected,
            execution_time_ms,
        })
    }

    fn query_error(&self, err: sqlx::Error, deadline: &Deadline) -> PlaygroundError {
        if deadline.expired() {
            warn!(timeout_secs = self.timeout.as_secs(), "Query interrupted by timeout");
            return PlaygroundError::query(format!(
                "query interrupted after exceeding the {}s timeout; the interrupted statement was rolled back",
                self.timeout.as_secs()
            ));
        }
        PlaygroundError::from_query_error(err)
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline enforced by a progress handler on the connection.
///
/// Once the deadline has passed the handler returns `false`, which makes the
/// engine abort the running statement with an interrupt error.
struct Deadline {
    expired: Arc<AtomicBool>,
}

impl Deadline {
    async fn arm(conn: &mut SqliteConnection, timeout: Duration) -> PlaygroundResult<Self> {
        let expired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&expired);
        let ends_at = Instant::now() + timeout;

        let mut handle = conn.lock_handle().await?;
        handle.set_progress_handler(PROGRESS_CHECK_OPS, move || {
            if Instant::now() < ends_at {
                return true;
            }
            flag.store(true, Ordering::Relaxed);
            false
        });

        Ok(Self { expired })
    }

    /// Remove the handler so later statements on the connection are unbounded
    /// by this deadline.
    async fn disarm(&self, conn: &mut SqliteConnection) {
        match conn.lock_handle().await {
            Ok(mut handle) => handle.remove_progress_handler(),
            Err(e) => warn!(error = %e, "Failed to remove query deadline"),
        }
    }

    fn expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }
}

/// Column names of a statement that produced no rows.
async fn describe_columns(conn: &mut SqliteConnection, sql: &str) -> PlaygroundResult<Vec<String>> {
    let statement = conn.prepare(sql).await?;
    Ok(statement
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect())
}

fn to_result(columns: Vec<String>, rows: &[SqliteRow], start: Instant) -> QueryResult {
    let values = rows.iter().map(row_values).collect();
    QueryResult::new(columns, values).with_execution_time(start.elapsed().as_millis() as u64)
}
