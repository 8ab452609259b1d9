//! Gateway error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration or startup error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation error (empty input)
    #[error("{0}")]
    Validation(String),

    /// SQL syntax error from the grammar parser
    #[error("SQL syntax error: {0}")]
    Syntax(String),

    /// Statement rejected by the read-only policy
    #[error("{0}")]
    Policy(String),

    /// Driver-level failure during submission or column introspection
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Row-level decode failure or mid-iteration driver error
    #[error("Row decode failed: {0}")]
    Decode(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Syntax(_) => StatusCode::BAD_REQUEST,
            Self::Policy(_) => StatusCode::BAD_REQUEST,
            Self::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for error responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
