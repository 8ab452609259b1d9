//! HTTP router
//!
//! Defines the axum router with all gateway endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::{health_check, run_query};
use crate::schema::{
    full_schema, list_databases, list_tables, table_columns, table_foreign_keys,
    table_primary_keys,
};
use crate::GatewayState;

/// Create the main router for the gateway
pub fn create_router(state: Arc<GatewayState>) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Schema endpoints
        .route("/databases", get(list_databases))
        .route("/tables", get(list_tables))
        .route("/table/{name}/columns", get(table_columns))
        .route("/table/{name}/primary-keys", get(table_primary_keys))
        .route("/table/{name}/foreign-keys", get(table_foreign_keys))
        .route("/schema", get(full_schema))
        // Query endpoint
        .route("/run-query", post(run_query))
        // Request logging
        .layer(TraceLayer::new_for_http());

    if state.config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.with_state(state)
}
