//! The playground page.
//!
//! Every interaction rebuilds the whole page from scratch: list the database
//! files, open the selected one, list its tables, fetch the sample rows and,
//! for a submitted query, run it. Whatever goes wrong along the way becomes a
//! notice on the page; the next interaction starts clean.

use crate::db::{SchemaInspector, Session, choose_table, find_database};
use crate::error::{PlaygroundError, PlaygroundResult};
use crate::format::format_value;
use crate::models::{DatabaseFile, QueryOutcome, QueryResult};
use crate::web::AppState;
use minijinja::Environment;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

const PAGE_TEMPLATE: &str = "playground.html";
const PAGE_TITLE: &str = "SQL Playground";

pub const SUCCESS_MESSAGE: &str = "Query executed successfully.";
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Database and table picked in the selection widgets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Selection {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub db: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub table: Option<String>,
}

/// Submitted query form. Carries the current selection along with the SQL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub db: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub sql: String,
}

impl QueryForm {
    pub fn selection(&self) -> Selection {
        Selection {
            db: self.db.clone(),
            table: self.table.clone(),
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<&PlaygroundError> for Notice {
    fn from(err: &PlaygroundError) -> Self {
        Notice::error(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseOption {
    pub name: String,
    pub size: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub text: String,
    pub null: bool,
    pub numeric: bool,
}

impl From<&JsonValue> for CellView {
    fn from(value: &JsonValue) -> Self {
        Self {
            text: format_value(value),
            null: value.is_null(),
            numeric: value.is_number(),
        }
    }
}

/// A result table ready for the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellView>>,
    pub execution_time_ms: u64,
}

impl From<&QueryResult> for TableView {
    fn from(result: &QueryResult) -> Self {
        Self {
            columns: result.columns.clone(),
            rows: result
                .rows
                .iter()
                .map(|row| row.iter().map(CellView::from).collect())
                .collect(),
            execution_time_ms: result.execution_time_ms,
        }
    }
}

/// Sample rows of the selected table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleView {
    pub table: String,
    pub data: TableView,
}

/// Everything the page template shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub title: String,
    pub databases_dir: String,
    pub databases: Vec<DatabaseOption>,
    pub selected_db: Option<String>,
    pub tables: Vec<String>,
    pub selected_table: Option<String>,
    pub sample: Option<SampleView>,
    pub query_text: String,
    pub query_result: Option<TableView>,
    /// Notices about the selection: missing folder content, unreadable files.
    pub notices: Vec<Notice>,
    /// Notices about the submitted query.
    pub query_notices: Vec<Notice>,
}

impl PageView {
    fn new(databases_dir: String, query_text: String) -> Self {
        Self {
            title: PAGE_TITLE.to_string(),
            databases_dir,
            query_text,
            ..Default::default()
        }
    }
}

/// Build the page for one interaction. `sql` is the submitted query, if any.
///
/// The database session is opened once and closed before returning, whatever
/// happened in between.
pub async fn build_page(state: &AppState, selection: Selection, sql: Option<String>) -> PageView {
    let mut page = PageView::new(
        state.directory.root().display().to_string(),
        sql.clone().unwrap_or_default(),
    );

    let files = match state.directory.list().await {
        Ok(files) => files,
        Err(e) => {
            page.notices.push(Notice::from(&e));
            return page;
        }
    };

    if files.is_empty() {
        let err = PlaygroundError::no_databases(page.databases_dir.clone());
        page.notices.push(
            Notice::warning(err.to_string())
                .with_detail("Add .db files to the folder and reload the page."),
        );
        page.notices.push(Notice::from(&PlaygroundError::NoDatabaseSelected));
        return page;
    }

    let selected = match select_database(&files, selection.db.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            page.databases = database_options(&files, None);
            page.notices.push(Notice::from(&e));
            return page;
        }
    };
    page.databases = database_options(&files, Some(&selected.name));
    page.selected_db = Some(selected.name.clone());

    let path = state.directory.path_of(selected);
    let mut session = match Session::open(&path).await {
        Ok(session) => session,
        Err(e) => {
            page.notices.push(Notice::from(&e));
            return page;
        }
    };

    fill_page(state, &mut session, &mut page, selection.table.as_deref(), sql.as_deref()).await;
    session.close().await;

    debug!(
        db = ?page.selected_db,
        table = ?page.selected_table,
        notices = page.notices.len() + page.query_notices.len(),
        "Built playground page"
    );
    page
}

fn select_database<'a>(
    files: &'a [DatabaseFile],
    requested: Option<&str>,
) -> PlaygroundResult<&'a DatabaseFile> {
    match requested {
        Some(name) => find_database(files, name),
        None => files.first().ok_or(PlaygroundError::NoDatabaseSelected),
    }
}

fn database_options(files: &[DatabaseFile], selected: Option<&str>) -> Vec<DatabaseOption> {
    files
        .iter()
        .map(|file| DatabaseOption {
            name: file.name.clone(),
            size: file.display_size(),
            selected: selected == Some(file.name.as_str()),
        })
        .collect()
}

async fn fill_page(
    state: &AppState,
    session: &mut Session,
    page: &mut PageView,
    requested_table: Option<&str>,
    sql: Option<&str>,
) {
    match SchemaInspector::list_tables(session.connection()).await {
        Ok(tables) => page.tables = tables,
        Err(e) => {
            page.notices.push(Notice::from(&e));
            return;
        }
    }

    page.selected_table = choose_table(&page.tables, requested_table);
    if let Some(table) = page.selected_table.clone() {
        load_sample(state, session, page, &table).await;
    }

    let Some(sql) = sql else {
        return;
    };

    match state.executor.execute_query(session.connection(), sql).await {
        Ok(QueryOutcome::Skipped) => {}
        Ok(QueryOutcome::Rows(result)) => page.query_result = Some(TableView::from(&result)),
        Ok(QueryOutcome::NoResults) => {
            page.query_notices.push(Notice::warning(NO_RESULTS_MESSAGE));
        }
        Ok(QueryOutcome::Committed {
            statement,
            rows_affected,
            ..
        }) => {
            let plural = if rows_affected == 1 { "row" } else { "rows" };
            page.query_notices.push(
                Notice::success(SUCCESS_MESSAGE)
                    .with_detail(format!("{}: {} {} affected", statement, rows_affected, plural)),
            );
            refresh_after_commit(state, session, page).await;
        }
        Err(e) => {
            warn!(db = ?page.selected_db, error = %e, "Query failed");
            page.query_notices.push(Notice::from(&e));
        }
    }
}

async fn load_sample(state: &AppState, session: &mut Session, page: &mut PageView, table: &str) {
    match state.executor.sample_rows(session.connection(), table).await {
        Ok(result) => {
            page.sample = Some(SampleView {
                table: table.to_string(),
                data: TableView::from(&result),
            });
        }
        Err(e) => page.notices.push(Notice::from(&e)),
    }
}

/// Re-read the table list and the sample rows so they show the committed state.
async fn refresh_after_commit(state: &AppState, session: &mut Session, page: &mut PageView) {
    match SchemaInspector::list_tables(session.connection()).await {
        Ok(tables) => page.tables = tables,
        Err(e) => {
            page.query_notices.push(Notice::from(&e));
            return;
        }
    }

    let Some(table) = page.selected_table.clone() else {
        return;
    };

    if !page.tables.contains(&table) {
        info!(table = %table, "Selected table no longer exists");
        page.sample = None;
        page.selected_table = None;
        page.query_notices.push(Notice::warning(format!(
            "Table '{}' no longer exists.",
            table
        )));
        return;
    }

    match state.executor.sample_rows(session.connection(), &table).await {
        Ok(result) => {
            page.sample = Some(SampleView {
                table,
                data: TableView::from(&result),
            });
        }
        Err(e) => page.query_notices.push(Notice::from(&e)),
    }
}

/// Renders [`PageView`]s into HTML.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> PlaygroundResult<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../../templates/playground.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, page: &PageView) -> PlaygroundResult<String> {
        let template = self.env.get_template(PAGE_TEMPLATE)?;
        Ok(template.render(page)?)
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer")
            .field("template", &PAGE_TEMPLATE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_empty_values_are_none() {
        let selection: Selection = serde_json::from_value(json!({ "db": "", "table": "  " })).unwrap();
        assert!(selection.db.is_none());
        assert!(selection.table.is_none());

        let selection: Selection = serde_json::from_value(json!({ "db": "shop.db" })).unwrap();
        assert_eq!(selection.db.as_deref(), Some("shop.db"));
        assert!(selection.table.is_none());
    }

    #[test]
    fn test_select_database() {
        let files = vec![DatabaseFile::new("a.db"), DatabaseFile::new("b.db")];
        assert_eq!(select_database(&files, None).unwrap().name, "a.db");
        assert_eq!(select_database(&files, Some("b.db")).unwrap().name, "b.db");
        assert!(matches!(
            select_database(&files, Some("c.db")),
            Err(PlaygroundError::DatabaseNotFound { .. })
        ));
        assert!(matches!(
            select_database(&[], None),
            Err(PlaygroundError::NoDatabaseSelected)
        ));
    }

    #[test]
    fn test_table_view_from_result() {
        let result = QueryResult::new(
            vec!["id".to_string(), "note".to_string()],
            vec![vec![json!(1), JsonValue::Null]],
        );
        let view = TableView::from(&result);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0][0].text, "1");
        assert!(view.rows[0][0].numeric);
        assert!(view.rows[0][1].null);
        assert_eq!(view.rows[0][1].text, "NULL");
    }

    #[test]
    fn test_render_escapes_cell_text() {
        let renderer = PageRenderer::new().unwrap();
        let mut page = PageView::new("databases".to_string(), String::new());
        page.selected_db = Some("shop.db".to_string());
        page.query_result = Some(TableView::from(&QueryResult::new(
            vec!["v".to_string()],
            vec![vec![json!("<script>alert(1)</script>")]],
        )));

        let html = renderer.render(&page).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_render_notices() {
        let renderer = PageRenderer::new().unwrap();
        let mut page = PageView::new("databases".to_string(), String::new());
        page.selected_db = Some("shop.db".to_string());
        page.notices.push(Notice::from(&PlaygroundError::NoDatabaseSelected));
        page.query_notices.push(Notice::success(SUCCESS_MESSAGE));

        let html = renderer.render(&page).unwrap();
        assert!(html.contains("No database selected"));
        assert!(html.contains(SUCCESS_MESSAGE));
    }
}
