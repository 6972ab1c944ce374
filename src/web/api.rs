//! JSON API.
//!
//! Same operations as the page, addressed by path instead of by form fields.
//! Each handler opens its own session and closes it before responding.

use crate::db::{SchemaInspector, Session};
use crate::error::{PlaygroundError, PlaygroundResult};
use crate::format::OutputFormat;
use crate::models::{DatabaseFile, QueryOutcome, QueryResult};
use crate::web::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct TableList {
    pub database: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    #[serde(default)]
    pub format: OutputFormat,
    /// Table whose sample rows are returned again after a committed write.
    #[serde(default)]
    pub table: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub database: String,
    pub outcome: QueryOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<QueryResult>,
    /// Set when the sample could not be refreshed after a committed write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `GET /api/databases`
pub async fn list_databases(State(state): State<AppState>) -> PlaygroundResult<Json<Vec<DatabaseFile>>> {
    Ok(Json(state.directory.list().await?))
}

/// `GET /api/databases/{db}/tables`
pub async fn list_tables(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> PlaygroundResult<Json<TableList>> {
    let mut session = open_session(&state, &db).await?;
    let result = SchemaInspector::list_tables(session.connection()).await;
    session.close().await;

    Ok(Json(TableList {
        database: db,
        tables: result?,
    }))
}

/// `GET /api/databases/{db}/tables/{table}/sample`
pub async fn sample_table(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
) -> PlaygroundResult<Json<QueryResult>> {
    let mut session = open_session(&state, &db).await?;
    let result = sample_existing_table(&state, &mut session, &db, &table).await;
    session.close().await;

    Ok(Json(result?))
}

/// `POST /api/databases/{db}/query`
pub async fn run_query(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Json(request): Json<QueryRequest>,
) -> PlaygroundResult<Json<QueryResponse>> {
    let mut session = open_session(&state, &db).await?;
    let result = run_in_session(&state, &mut session, &db, &request).await;
    session.close().await;

    Ok(Json(result?))
}

async fn open_session(state: &AppState, db: &str) -> PlaygroundResult<Session> {
    let path = state.directory.resolve(db).await?;
    Session::open(&path).await
}

async fn sample_existing_table(
    state: &AppState,
    session: &mut Session,
    db: &str,
    table: &str,
) -> PlaygroundResult<QueryResult> {
    let tables = SchemaInspector::list_tables(session.connection()).await?;
    if !tables.iter().any(|t| t == table) {
        return Err(PlaygroundError::table_not_found(table, db));
    }
    state.executor.sample_rows(session.connection(), table).await
}

async fn run_in_session(
    state: &AppState,
    session: &mut Session,
    db: &str,
    request: &QueryRequest,
) -> PlaygroundResult<QueryResponse> {
    let outcome = state
        .executor
        .execute_query(session.connection(), &request.sql)
        .await?;

    let mut response = QueryResponse {
        database: db.to_string(),
        rendered: match &outcome {
            QueryOutcome::Rows(result) => request.format.render(result),
            _ => None,
        },
        outcome,
        sample: None,
        warning: None,
    };

    if !response.outcome.is_committed() {
        return Ok(response);
    }
    info!(db = %db, table = ?request.table, "Query committed via API");

    // The write is already committed; refresh problems are reported alongside it
    if let Some(table) = request.table.as_deref() {
        match sample_existing_table(state, session, db, table).await {
            Ok(sample) => response.sample = Some(sample),
            Err(PlaygroundError::TableNotFound { .. }) => {
                response.warning = Some(format!("Table '{}' no longer exists.", table));
            }
            Err(e) => {
                warn!(db = %db, table = %table, error = %e, "Sample refresh failed");
                response.warning = Some(e.to_string());
            }
        }
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_defaults() {
        let request: QueryRequest = serde_json::from_value(json!({ "sql": "SELECT 1" })).unwrap();
        assert_eq!(request.format, OutputFormat::Json);
        assert!(request.table.is_none());
    }

    #[test]
    fn test_query_response_skips_empty_fields() {
        let response = QueryResponse {
            database: "shop.db".to_string(),
            outcome: QueryOutcome::NoResults,
            rendered: None,
            sample: None,
            warning: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "database": "shop.db", "outcome": { "kind": "no_results" } })
        );
    }
}
