//! Shared-secret authentication middleware
//!
//! The secret travels inside the JSON body as `<provider>_shared_secret`
//! and must equal the configured secret exactly. The parsed body is handed
//! to the handler through request extensions so it is read only once.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Request bodies above this size are refused
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Authenticated JSON request body
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

/// Authentication middleware
///
/// Returns 401 `{"message": "Invalid shared secret"}` and stops the request
/// when the secret is wrong, missing, or the body cannot be read as JSON.
pub async fn shared_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!("Failed to read provisioning request body: {}", e);
            ApiError::Unauthorized
        })?;

    let payload: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    let field = state.config.secret_field();
    let candidate = payload.get(&field).and_then(Value::as_str);
    if !state.config.authenticates(candidate) {
        warn!(path = %parts.uri.path(), "Rejected request with invalid shared secret");
        return Err(ApiError::Unauthorized);
    }

    parts.extensions.insert(Payload(payload));
    let request = Request::from_parts(parts, axum::body::Body::empty());
    Ok(next.run(request).await)
}
