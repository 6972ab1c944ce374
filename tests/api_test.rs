//! Integration tests for the JSON API.

mod common;

use axum::http::StatusCode;
use common::{app, body_json, get, post_json};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_list_databases() {
    let dir = common::shop_dir().await;

    let response = app(dir.path()).oneshot(get("/api/databases")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let databases = body.as_array().unwrap();
    assert_eq!(databases.len(), 1);
    assert_eq!(databases[0]["name"], "shop.db");
    assert!(databases[0]["size_bytes"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_list_tables() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(get("/api/databases/shop.db/tables"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "database": "shop.db", "tables": ["items"] })
    );
}

#[tokio::test]
async fn test_unknown_database_is_404() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(get("/api/databases/nope.db/tables"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "DATABASE_NOT_FOUND");
}

#[tokio::test]
async fn test_sample_table() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(get("/api/databases/shop.db/tables/items/sample"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["columns"], json!(["id", "name", "price"]));
    assert_eq!(body["rows"].as_array().unwrap().len(), 3);
    assert_eq!(body["rows"][1], json!([2, "Gadget", 10.0]));
}

#[tokio::test]
async fn test_sample_unknown_table_is_404() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(get("/api/databases/shop.db/tables/ghosts/sample"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "TABLE_NOT_FOUND");
}

#[tokio::test]
async fn test_query_select_rows() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "SELECT id, name FROM items WHERE id = 2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["outcome"]["kind"], "rows");
    assert_eq!(body["outcome"]["columns"], json!(["id", "name"]));
    assert_eq!(body["outcome"]["rows"], json!([[2, "Gadget"]]));
    assert!(body.get("rendered").is_none());
}

#[tokio::test]
async fn test_query_rendered_as_table() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "SELECT id FROM items ORDER BY id", "format": "table" }),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    let rendered = body["rendered"].as_str().unwrap();
    assert!(rendered.starts_with("+----+\n| id |\n+----+\n"));
    assert!(rendered.contains("3 rows in set"));
}

#[tokio::test]
async fn test_query_no_results() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "SELECT * FROM items WHERE name = 'none'" }),
        ))
        .await
        .unwrap();

    assert_eq!(body_json(response).await["outcome"], json!({ "kind": "no_results" }));
}

#[tokio::test]
async fn test_query_commit_returns_refreshed_sample() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "DELETE FROM items WHERE id=1", "table": "items" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["outcome"]["kind"], "committed");
    assert_eq!(body["outcome"]["statement"], "DELETE");
    assert_eq!(body["outcome"]["rows_affected"], 1);
    assert_eq!(body["sample"]["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_query_error_is_400() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "SELECT * FROM missing_table" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "QUERY_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Error executing query: no such table: missing_table"
    );
}

#[tokio::test]
async fn test_query_dropping_refresh_table_still_succeeds() {
    let dir = common::shop_dir().await;

    let response = app(dir.path())
        .oneshot(post_json(
            "/api/databases/shop.db/query",
            json!({ "sql": "DROP TABLE items", "table": "items" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["outcome"]["kind"], "committed");
    assert_eq!(body["outcome"]["statement"], "DROP");
    assert!(body.get("sample").is_none());
    assert!(body["warning"].as_str().unwrap().contains("no longer exists"));

    // The drop was committed
    let response = app(dir.path())
        .oneshot(get("/api/databases/shop.db/tables"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["tables"], json!([]));
}
