//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific domain.

pub mod auth;
pub mod command;
pub mod error;
pub mod health;
pub mod logs;
pub mod status;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::host::HostHandle;
use crate::service::{CommandExecutor, LogStore};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<dyn CommandExecutor>,
    pub logs: Arc<LogStore>,
    pub host: HostHandle,
    pub api_key: Arc<str>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Server endpoints
        .route("/status", get(status::get_status))
        .route("/commands", get(status::list_commands))
        .route("/plugins", get(status::list_plugins))
        .route("/players", get(status::list_players))
        .route("/command", post(command::execute_commands))
        // Log endpoints
        .route("/logs", get(logs::get_logs))
        .route("/logs/errors", get(logs::get_errors))
        .route("/logs/warnings", get(logs::get_warnings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .fallback(health::not_found)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
