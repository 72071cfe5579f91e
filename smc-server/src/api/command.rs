//! Command API Handler
//!
//! Runs one or more commands on the host through the command bridge.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use smc_core::dto::command::{CommandInput, CommandRequest, CommandResponse};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /api/command
/// Execute commands in order and return one result per command
///
/// Per-command failures (validation, timeout, host errors) are reported in
/// the results, not as HTTP errors.
pub async fn execute_commands(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> ApiResult<Json<CommandResponse>> {
    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e.body_text())))?;

    let commands = request
        .commands
        .map(CommandInput::into_commands)
        .ok_or_else(|| ApiError::BadRequest("Missing 'commands' field".to_string()))?;

    if commands.is_empty() {
        return Err(ApiError::BadRequest("No commands provided".to_string()));
    }

    tracing::info!("Executing {} command(s)", commands.len());

    let results = state.bridge.execute_batch(&commands).await;

    Ok(Json(CommandResponse { results }))
}
