//! Error types for ptx-ip
//!
//! Every error except `Upstream` renders as `{"message": "..."}`.
//! `Upstream` carries an identity-provider response that is handed back to
//! the caller verbatim, status and body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::identity::IdentityError;

/// Response message for a bad or missing shared secret
pub const INVALID_SHARED_SECRET: &str = "Invalid shared secret";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Shared secret missing or wrong (401)
    #[error("{}", INVALID_SHARED_SECRET)]
    Unauthorized,

    /// Required payload attributes missing or mistyped (400)
    #[error("{0}")]
    BadRequest(String),

    /// Identity provider answered with something other than success
    #[error("Identity provider responded {status}")]
    Upstream { status: u16, body: String },

    /// Identity provider unreachable or unintelligible (502)
    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                return (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
                    .into_response();
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, INVALID_SHARED_SECRET.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Identity(ref err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ApiError::Database(ref err) => {
                error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
