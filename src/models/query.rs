//! Query-related data models.
//!
//! This module defines the tabular result of a query and the outcome of running
//! user-supplied SQL.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Number of rows shown when previewing a table.
pub const SAMPLE_ROW_LIMIT: u32 = 10;

/// Column names plus rows in result order. Cells keep their column position, so
/// duplicate column names (`SELECT 1, 1`) survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self {
            columns,
            rows,
            execution_time_ms: 0,
        }
    }

    pub fn with_execution_time(mut self, execution_time_ms: u64) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }

    /// Get the number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What happened when user-supplied SQL was run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Blank input; nothing was executed.
    Skipped,
    /// A read query that returned at least one row.
    Rows(QueryResult),
    /// A read query that matched nothing.
    NoResults,
    /// A write or DDL statement that completed and was committed.
    Committed {
        /// Short label such as "DELETE" or "CREATE TABLE"
        statement: String,
        rows_affected: u64,
        execution_time_ms: u64,
    },
}

impl QueryOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_result_counts() {
        let result = QueryResult::new(
            vec!["id".into(), "name".into()],
            vec![vec![json!(1), json!("apple")], vec![json!(2), json!("pear")]],
        );
        assert_eq!(result.row_count(), 2);
        assert!(!result.is_empty());
        assert!(QueryResult::default().is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let committed = QueryOutcome::Committed {
            statement: "DELETE".into(),
            rows_affected: 1,
            execution_time_ms: 3,
        };
        let json = serde_json::to_value(&committed).unwrap();
        assert_eq!(json["kind"], "committed");
        assert_eq!(json["rows_affected"], 1);
        assert!(committed.is_committed());

        let json = serde_json::to_value(QueryOutcome::NoResults).unwrap();
        assert_eq!(json, json!({ "kind": "no_results" }));
    }

    #[test]
    fn test_rows_outcome_serializes_result_inline() {
        let outcome = QueryOutcome::Rows(QueryResult::new(vec!["n".into()], vec![vec![json!(1)]]));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "rows");
        assert_eq!(json["columns"], json!(["n"]));
        assert_eq!(json["rows"], json!([[1]]));
    }
}
