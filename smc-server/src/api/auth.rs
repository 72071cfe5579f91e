//! API key authentication
//!
//! Every `/api/*` route requires the configured shared secret in the
//! `x-api-key` header.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::AppState;
use super::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware rejecting requests without a valid API key
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_authorized(request.headers(), &state.api_key) {
        tracing::warn!(
            "Rejected unauthenticated request to {}",
            request.uri().path()
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// True when the `x-api-key` header matches `expected`
pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }

    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|provided| bool::from(provided.as_bytes().ct_eq(expected.as_bytes())))
}
