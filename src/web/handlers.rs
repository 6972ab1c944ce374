//! HTML page handlers.

use crate::error::PlaygroundResult;
use crate::web::AppState;
use crate::web::page::{QueryForm, Selection, build_page};
use axum::Form;
use axum::extract::{Query, State};
use axum::response::Html;
use tracing::debug;

/// `GET /`: render the page for the current selection.
pub async fn show_page(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> PlaygroundResult<Html<String>> {
    debug!(db = ?selection.db, table = ?selection.table, "Rendering page");
    let page = build_page(&state, selection, None).await;
    Ok(Html(state.renderer.render(&page)?))
}

/// `POST /`: run the submitted query, then render the page.
pub async fn submit_query(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> PlaygroundResult<Html<String>> {
    let selection = form.selection();
    let page = build_page(&state, selection, Some(form.sql)).await;
    Ok(Html(state.renderer.render(&page)?))
}

pub async fn health() -> &'static str {
    "ok"
}
