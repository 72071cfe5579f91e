//! Health Check API Handler
//!
//! Unauthenticated liveness probe for monitoring.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for routes that do not exist
pub async fn not_found() -> super::error::ApiError {
    super::error::ApiError::NotFound("Endpoint not found".to_string())
}
