//! Classification of user-supplied SQL.
//!
//! Whether text is treated as a read query is decided by its leading keyword
//! alone. The keyword must end on a word boundary, so `SELECTED ...` or
//! `select_all` is not a read; a plain case-insensitive prefix check on
//! `select` would accept both. The engine stays the authority on what the text actually does;
//! `sqlparser` is only consulted to label committed statements.

use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use tracing::debug;

const SELECT_KEYWORD: &str = "select";

/// Label used when the parser cannot name the statement.
pub const GENERIC_STATEMENT_LABEL: &str = "statement";

/// True if the text is blank.
pub fn is_blank(sql: &str) -> bool {
    sql.trim().is_empty()
}

/// True if the first keyword of the text is `SELECT`, case-insensitively.
pub fn is_select(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let Some(head) = trimmed.get(..SELECT_KEYWORD.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(SELECT_KEYWORD) {
        return false;
    }
    !trimmed[SELECT_KEYWORD.len()..].starts_with(|c: char| c.is_alphanumeric() || c == '_')
}

/// Short label for the statement(s) in the text, e.g. "DELETE" or
/// "CREATE TABLE".
pub fn statement_label(sql: &str) -> String {
    match Parser::parse_sql(&SQLiteDialect {}, sql) {
        Ok(statements) => match statements.as_slice() {
            [] => GENERIC_STATEMENT_LABEL.to_string(),
            [single] => label_for(single).to_string(),
            many => format!("{} statements", many.len()),
        },
        Err(e) => {
            debug!(error = %e, "Statement not recognised by parser");
            GENERIC_STATEMENT_LABEL.to_string()
        }
    }
}

fn label_for(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Query(_) => "SELECT",
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable { .. } => "CREATE TABLE",
        Statement::CreateView { .. } => "CREATE VIEW",
        Statement::CreateIndex(_) => "CREATE INDEX",
        Statement::CreateTrigger { .. } => "CREATE TRIGGER",
        Statement::CreateVirtualTable { .. } => "CREATE VIRTUAL TABLE",
        Statement::AlterTable { .. } => "ALTER TABLE",
        Statement::Drop { .. } => "DROP",
        _ => GENERIC_STATEMENT_LABEL,
    }
}
