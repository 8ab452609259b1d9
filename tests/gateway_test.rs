//! Gateway HTTP tests
//!
//! The rejection-path tests use a lazily-connected pool pointing at an
//! unreachable address: a request that is rejected by the policy layer
//! never touches the database, so these pass without one. Anything that
//! slipped past the policy would surface as a 500 instead of the expected
//! 400. The round-trip tests need a live PostgreSQL via DATABASE_URL and
//! are ignored by default.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use pglens::router::create_router;
use pglens::{GatewayConfig, GatewayState};

fn offline_app() -> Router {
    let config = GatewayConfig::builder()
        .database("postgres://postgres@127.0.0.1:1/unreachable")
        .build();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    create_router(Arc::new(GatewayState { pool, config }))
}

async fn live_app() -> Option<Router> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = GatewayConfig::builder().database(&url).build();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    Some(create_router(Arc::new(GatewayState { pool, config })))
}

async fn post_query(app: Router, sql: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(http::Method::POST)
        .uri("/run-query")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "sql": sql }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn empty_sql_is_rejected() {
    let (status, body) = post_query(offline_app(), "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SQL cannot be empty");
}

#[tokio::test]
async fn whitespace_sql_is_rejected() {
    let (status, body) = post_query(offline_app(), "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SQL cannot be empty");
}

#[tokio::test]
async fn invalid_sql_is_a_syntax_error() {
    let (status, body) = post_query(offline_app(), "definitely not sql").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("SQL syntax error:"), "got: {message}");
}

#[tokio::test]
async fn write_statements_are_rejected() {
    for sql in [
        "INSERT INTO users (id) VALUES (1)",
        "UPDATE users SET name = 'x'",
        "DELETE FROM users",
        "DROP TABLE users",
        "CREATE TABLE t (id INT)",
    ] {
        let (status, body) = post_query(offline_app(), sql).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "for {sql:?}");
        assert_eq!(body["error"], "only SELECT statements are allowed");
    }
}

#[tokio::test]
async fn statement_chaining_is_rejected() {
    let (status, body) =
        post_query(offline_app(), "  select * from users; drop table users;").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "only SELECT statements are allowed");
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL via DATABASE_URL"]
async fn select_round_trip() {
    let app = live_app().await.expect("DATABASE_URL not set");
    let (status, body) = post_query(app, "SELECT 1 AS x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"columns": ["x"], "rows": [{"x": 1}]})
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL via DATABASE_URL"]
async fn null_cells_are_explicit() {
    let app = live_app().await.expect("DATABASE_URL not set");
    let (status, body) = post_query(app, "SELECT NULL::int AS a, 'b'::text AS b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"columns": ["a", "b"], "rows": [{"a": null, "b": "b"}]})
    );
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL via DATABASE_URL"]
async fn default_limit_caps_large_results() {
    let app = live_app().await.expect("DATABASE_URL not set");
    let (status, body) = post_query(app, "SELECT generate_series(1, 200) AS n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 100);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL via DATABASE_URL"]
async fn repeated_reads_are_identical() {
    let sql = "SELECT n, n * 2 AS doubled FROM generate_series(1, 10) AS n ORDER BY n";
    let first = post_query(live_app().await.expect("DATABASE_URL not set"), sql).await;
    let second = post_query(live_app().await.expect("DATABASE_URL not set"), sql).await;
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL via DATABASE_URL"]
async fn empty_result_still_reports_columns() {
    let app = live_app().await.expect("DATABASE_URL not set");
    let (status, body) = post_query(app, "SELECT 1 AS x WHERE false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"columns": ["x"], "rows": []}));
}
