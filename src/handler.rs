//! HTTP request handlers
//!
//! The ad-hoc query endpoint and the health check. Control flow on the
//! query path is strictly linear per request: classify, enforce, execute,
//! materialize, respond. No state is retained across requests beyond the
//! shared pool.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::executor::{self, QueryResult};
use crate::policy;
use crate::GatewayState;

/// Ad-hoc query request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pool_size: u32,
    pub pool_idle: usize,
}

pub async fn health_check(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pool_size: state.pool.size(),
        pool_idle: state.pool.num_idle(),
    })
}

/// Execute a user-supplied read-only query.
pub async fn run_query(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResult>, GatewayError> {
    let sql = policy::authorize(&request.sql).map_err(|e| {
        tracing::warn!("Rejected query: {}", e);
        e
    })?;

    tracing::info!("Executing query: {}", sql);

    let result = executor::run_query(&state.pool, &sql).await.map_err(|e| {
        tracing::error!("Query failed: {}", e);
        e
    })?;

    tracing::debug!(
        "Query returned {} rows, {} columns",
        result.rows.len(),
        result.columns.len()
    );

    Ok(Json(result))
}
