//! Command bridge
//!
//! Runs remotely submitted commands on the host thread and hands the
//! captured output back to the caller:
//! - Validates input before anything is dispatched
//! - Queues the cleaned command onto the host thread
//! - Waits up to the configured timeout for the host to answer
//!
//! A timeout abandons the queued command rather than cancelling it. The
//! host may still run it later; its result is then dropped because nobody
//! is listening on the reply channel any more.

use async_trait::async_trait;
use smc_core::domain::command::{CommandResult, ValidationOutcome};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::host::{CaptureSink, CommandHost, HostError, HostHandle, panic_message};

/// Longest command accepted, in characters
pub const MAX_COMMAND_LENGTH: usize = 1000;

/// Leading character stripped before dispatch (`/say hi` runs `say hi`)
pub const COMMAND_PREFIX: char = '/';

/// Service trait for executing commands on the host
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Checks a command without executing it
    fn validate(&self, command: &str) -> ValidationOutcome;

    /// Executes one command and waits for its result
    async fn execute(&self, command: &str) -> CommandResult;

    /// Executes commands one at a time, in order
    ///
    /// Each command is fully resolved (success, failure or timeout) before
    /// the next one is dispatched.
    async fn execute_batch(&self, commands: &[String]) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            results.push(self.execute(command).await);
        }
        results
    }
}

/// Executor that dispatches onto the host thread
pub struct CommandBridge {
    host: HostHandle,
    timeout: Duration,
    blacklist: Vec<String>,
}

impl CommandBridge {
    /// # Arguments
    /// * `host` - Handle to the host thread
    /// * `timeout` - How long a caller waits for the host to answer
    /// * `blacklist` - Base commands that are never dispatched (case-insensitive)
    pub fn new(host: HostHandle, timeout: Duration, blacklist: Vec<String>) -> Self {
        Self {
            host,
            timeout,
            blacklist: blacklist.into_iter().map(|c| c.to_lowercase()).collect(),
        }
    }

    fn timeout_message(&self) -> String {
        format!(
            "Command execution timed out after {} seconds",
            self.timeout.as_secs()
        )
    }
}

#[async_trait]
impl CommandExecutor for CommandBridge {
    fn validate(&self, command: &str) -> ValidationOutcome {
        validate_command(command, &self.blacklist)
    }

    async fn execute(&self, command: &str) -> CommandResult {
        if let ValidationOutcome::Invalid(reason) = self.validate(command) {
            debug!("Rejected command {:?}: {}", command, reason);
            return CommandResult::failure(command, reason);
        }

        let span = info_span!("command", execution_id = %Uuid::new_v4());

        async {
            let clean = strip_prefix(command).to_string();
            let (reply_tx, reply_rx) = oneshot::channel();

            let submitted = self.host.submit(move |host| {
                // The caller may have timed out already; nobody to tell then
                let _ = reply_tx.send(dispatch_captured(host, &clean));
            });
            if let Err(e) = submitted {
                warn!("Cannot queue command {:?}: {}", command, e);
                return CommandResult::failure(command, e.to_string());
            }

            match tokio::time::timeout(self.timeout, reply_rx).await {
                Ok(Ok(Dispatch::Completed(output))) => {
                    debug!("Command {:?} completed", command);
                    CommandResult::success(command, output)
                }
                Ok(Ok(Dispatch::Refused)) => {
                    CommandResult::failure(command, "Command execution returned false")
                }
                Ok(Ok(Dispatch::Failed(message))) => {
                    error!("Error executing command {:?}: {}", command, message);
                    CommandResult::failure(command, format!("Exception: {}", message))
                }
                Ok(Err(_)) => CommandResult::failure(command, HostError::Stopped.to_string()),
                Err(_) => {
                    warn!("Command timeout: {:?}", command);
                    CommandResult::failure(command, self.timeout_message())
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// What the host thread reports back for one dispatch
enum Dispatch {
    Completed(String),
    Refused,
    Failed(String),
}

/// Runs one command on the host with a fresh capture sink
///
/// Host errors and panics are turned into [`Dispatch::Failed`] so they never
/// unwind into the host thread's task loop.
fn dispatch_captured(host: &mut dyn CommandHost, command: &str) -> Dispatch {
    let mut sink = CaptureSink::new();

    match panic::catch_unwind(AssertUnwindSafe(|| host.dispatch(&mut sink, command))) {
        Ok(Ok(true)) => Dispatch::Completed(sink.into_output()),
        Ok(Ok(false)) => Dispatch::Refused,
        Ok(Err(e)) => Dispatch::Failed(e.to_string()),
        Err(payload) => Dispatch::Failed(panic_message(payload.as_ref())),
    }
}

/// Validates a command against length and blacklist rules
///
/// `blacklist` entries must already be lowercase.
pub fn validate_command(command: &str, blacklist: &[String]) -> ValidationOutcome {
    if command.trim().is_empty() {
        return ValidationOutcome::Invalid("Command cannot be empty".to_string());
    }

    if command.chars().count() > MAX_COMMAND_LENGTH {
        return ValidationOutcome::Invalid(format!(
            "Command is too long (max {} characters)",
            MAX_COMMAND_LENGTH
        ));
    }

    if let Some(base) = base_command(command) {
        if blacklist.contains(&base) {
            return ValidationOutcome::Invalid(
                "Command is blacklisted and cannot be executed".to_string(),
            );
        }
    }

    ValidationOutcome::Valid
}

/// Trims the command and removes one leading [`COMMAND_PREFIX`]
fn strip_prefix(command: &str) -> &str {
    let trimmed = command.trim();
    trimmed.strip_prefix(COMMAND_PREFIX).unwrap_or(trimmed)
}

/// First word of the command, lowercased, without the prefix
fn base_command(command: &str) -> Option<String> {
    strip_prefix(command)
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
}
