//! Status API Handlers
//!
//! Host version, commands, plugins and players. All of it is read on the
//! host thread.

use axum::{Json, extract::State};
use smc_core::dto::status::{CommandsResponse, PlayersResponse, PluginsResponse, StatusResponse};
use smc_core::version::{ServerVersion, VersionChannel};
use std::time::Duration;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::host::{CommandHost, HostError, HostHandle};

/// Upper bound for read-only queries against the host thread
const HOST_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// GET /api/status
/// Host version and the feature channel it maps to
///
/// A stopped host is reported as `online: false`, not as an error.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let raw = match query_host(&state.host, |host| host.version()).await {
        Ok(raw) => raw,
        Err(HostError::Stopped) => {
            return Ok(Json(StatusResponse {
                online: false,
                server_version: String::new(),
                host_version: String::new(),
                plugin_version: env!("CARGO_PKG_VERSION").to_string(),
                version_channel: VersionChannel::Unsupported,
            }));
        }
        Err(e) => return Err(internal(e)),
    };
    let version = ServerVersion::parse(&raw);

    Ok(Json(StatusResponse {
        online: true,
        server_version: raw,
        host_version: version.to_string(),
        plugin_version: env!("CARGO_PKG_VERSION").to_string(),
        version_channel: VersionChannel::detect(version),
    }))
}

/// GET /api/commands
/// Commands the host can dispatch, sorted by name
pub async fn list_commands(State(state): State<AppState>) -> ApiResult<Json<CommandsResponse>> {
    tracing::debug!("Listing host commands");

    let mut commands = query_host(&state.host, |host| host.commands())
        .await
        .map_err(internal)?;
    commands.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(CommandsResponse::from(commands)))
}

/// GET /api/plugins
/// Plugins loaded into the host
pub async fn list_plugins(State(state): State<AppState>) -> ApiResult<Json<PluginsResponse>> {
    let plugins = query_host(&state.host, |host| host.plugins())
        .await
        .map_err(internal)?;

    Ok(Json(PluginsResponse { plugins }))
}

/// GET /api/players
/// Players currently connected, with count
pub async fn list_players(State(state): State<AppState>) -> ApiResult<Json<PlayersResponse>> {
    let players = query_host(&state.host, |host| host.players())
        .await
        .map_err(internal)?;

    Ok(Json(PlayersResponse::from(players)))
}

fn internal(e: HostError) -> ApiError {
    ApiError::InternalError(e.to_string())
}

async fn query_host<F, R>(host: &HostHandle, f: F) -> Result<R, HostError>
where
    F: FnOnce(&mut dyn CommandHost) -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::time::timeout(HOST_QUERY_TIMEOUT, host.call(f))
        .await
        .unwrap_or_else(|_| {
            Err(HostError::TaskFailed(
                "timed out waiting for the host".to_string(),
            ))
        })
}
