//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use sql_playground::db::{DatabaseDirectory, QueryExecutor};
use sql_playground::web::{AppState, playground_router};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a SQLite file and run the given statements against it.
pub async fn create_db(dir: &Path, name: &str, statements: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut conn: SqliteConnection = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    for sql in statements {
        sqlx::query(sql).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();
    path
}

/// `shop.db` with an `items` table holding three rows.
pub async fn create_shop_db(dir: &Path) -> PathBuf {
    create_db(
        dir,
        "shop.db",
        &[
            "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL)",
            "INSERT INTO items (id, name, price) VALUES (1, 'Widget', 2.5), (2, 'Gadget', 10.0), (3, 'Gizmo', NULL)",
        ],
    )
    .await
}

/// A databases folder containing only `shop.db`.
pub async fn shop_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    create_shop_db(dir.path()).await;
    dir
}

pub fn app(dir: &Path) -> Router {
    let state =
        AppState::from_parts(DatabaseDirectory::new(dir), QueryExecutor::new()).unwrap();
    playground_router(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn sample_row_count(html: &str) -> usize {
    html.matches("class=\"sample-row\"").count()
}

pub fn result_row_count(html: &str) -> usize {
    html.matches("class=\"result-row\"").count()
}
