//! Schema introspection.
//!
//! Table names come from `sqlite_master`. Whenever a name has to be spliced
//! into SQL text it goes through [`quote_ident`]; identifiers cannot be bound
//! as query parameters.

use crate::error::PlaygroundResult;
use sqlx::sqlite::SqliteConnection;
use tracing::debug;

mod queries {
    pub const LIST_TABLES: &str = r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table'
        ORDER BY name
        "#;
}

/// Quote an SQL identifier.
///
/// Wraps the identifier in double quotes and doubles any embedded double
/// quote, so the result always names exactly one identifier.
///
/// ```
/// use sql_playground::db::quote_ident;
/// assert_eq!(quote_ident("items"), r#""items""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// List table names from the catalog, sorted by name.
    pub async fn list_tables(conn: &mut SqliteConnection) -> PlaygroundResult<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(queries::LIST_TABLES)
            .fetch_all(&mut *conn)
            .await?;

        debug!(count = tables.len(), "Listed SQLite tables");
        Ok(tables)
    }
}

/// Pick the table to display: the requested one if the catalog has it,
/// otherwise the first table, mirroring a selection widget that falls back to
/// its first option.
pub fn choose_table(tables: &[String], requested: Option<&str>) -> Option<String> {
    match requested {
        Some(name) if tables.iter().any(|t| t == name) => Some(name.to_string()),
        Some(name) => {
            debug!(table = %name, "Requested table not in catalog, using first table");
            tables.first().cloned()
        }
        None => tables.first().cloned(),
    }
}
