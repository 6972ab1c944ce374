//! Error types for the SQL playground.
//!
//! All failures are terminal to the current interaction only. The HTML page
//! turns them into notices; the JSON API maps them to status codes.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("No databases found in '{directory}'")]
    NoDatabases { directory: String },

    #[error("No database selected")]
    NoDatabaseSelected,

    #[error("Database '{name}' not found")]
    DatabaseNotFound { name: String },

    #[error("Table '{table}' not found in '{database}'")]
    TableNotFound { table: String, database: String },

    /// Any engine failure while running user-supplied SQL.
    #[error("Error executing query: {message}")]
    Query { message: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// SQLite extended result code, when the engine reported one
        code: Option<String>,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlaygroundError {
    pub fn no_databases(directory: impl Into<String>) -> Self {
        Self::NoDatabases {
            directory: directory.into(),
        }
    }

    pub fn database_not_found(name: impl Into<String>) -> Self {
        Self::DatabaseNotFound { name: name.into() }
    }

    pub fn table_not_found(table: impl Into<String>, database: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
            database: database.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            code,
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap an engine error raised by user-supplied SQL, keeping the engine's
    /// own message verbatim.
    pub fn from_query_error(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self::query(db_err.message()),
            other => Self::query(other.to_string()),
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDatabases { .. } => "NO_DATABASES",
            Self::NoDatabaseSelected => "NO_DATABASE_SELECTED",
            Self::DatabaseNotFound { .. } => "DATABASE_NOT_FOUND",
            Self::TableNotFound { .. } => "TABLE_NOT_FOUND",
            Self::Query { .. } => "QUERY_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Io { .. } | Self::Render { .. } | Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoDatabases { .. }
            | Self::DatabaseNotFound { .. }
            | Self::TableNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NoDatabaseSelected
            | Self::Query { .. }
            | Self::Connection { .. }
            | Self::Database { .. } => StatusCode::BAD_REQUEST,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::Io { .. } | Self::Render { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convert sqlx errors raised by the tool's own fixed queries.
impl From<sqlx::Error> for PlaygroundError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => PlaygroundError::connection(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                PlaygroundError::database(db_err.message(), code)
            }
            sqlx::Error::Io(io_err) => PlaygroundError::connection(format!("I/O error: {}", io_err)),
            sqlx::Error::Protocol(msg) => {
                PlaygroundError::connection(format!("Protocol error: {}", msg))
            }
            sqlx::Error::ColumnNotFound(col) => {
                PlaygroundError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                PlaygroundError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                PlaygroundError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => PlaygroundError::internal("Database worker crashed"),
            _ => PlaygroundError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

impl From<minijinja::Error> for PlaygroundError {
    fn from(err: minijinja::Error) -> Self {
        PlaygroundError::Render {
            message: err.to_string(),
        }
    }
}

/// Result type alias for playground operations.
pub type PlaygroundResult<T> = Result<T, PlaygroundError>;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

impl IntoResponse for PlaygroundError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
