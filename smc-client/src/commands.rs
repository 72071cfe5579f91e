//! Server status and command execution endpoints

use crate::SmcClient;
use crate::error::{ClientError, Result};
use smc_core::domain::command::CommandResult;
use smc_core::dto::command::{CommandInput, CommandRequest, CommandResponse};
use smc_core::dto::status::{
    CommandsResponse, PlayersResponse, PluginInfo, PluginsResponse, StatusResponse,
};

impl SmcClient {
    /// Get server status and version information
    pub async fn status(&self) -> Result<StatusResponse> {
        let response = self.get("/api/status").send().await?;

        self.handle_response(response).await
    }

    /// List the commands the server can run
    pub async fn commands(&self) -> Result<CommandsResponse> {
        let response = self.get("/api/commands").send().await?;

        self.handle_response(response).await
    }

    /// Plugins loaded on the server
    pub async fn plugins(&self) -> Result<Vec<PluginInfo>> {
        let response = self.get("/api/plugins").send().await?;

        let body: PluginsResponse = self.handle_response(response).await?;
        Ok(body.plugins)
    }

    /// Players currently online
    pub async fn players(&self) -> Result<PlayersResponse> {
        let response = self.get("/api/players").send().await?;

        self.handle_response(response).await
    }

    /// Execute a single command
    ///
    /// A command that ran but failed (blacklisted, timed out, ...) is still
    /// `Ok`; check [`CommandResult::is_success`].
    pub async fn execute(&self, command: &str) -> Result<CommandResult> {
        let results = self
            .send_commands(CommandInput::Single(command.to_string()))
            .await?;

        results
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::ParseError("Server returned no results".to_string()))
    }

    /// Execute several commands in order
    ///
    /// # Returns
    /// One result per command, in the order given
    pub async fn execute_batch(&self, commands: &[String]) -> Result<Vec<CommandResult>> {
        if commands.is_empty() {
            return Err(ClientError::InvalidRequest(
                "No commands provided".to_string(),
            ));
        }

        self.send_commands(CommandInput::Batch(commands.to_vec()))
            .await
    }

    async fn send_commands(&self, input: CommandInput) -> Result<Vec<CommandResult>> {
        let request = CommandRequest {
            commands: Some(input),
        };
        let response = self.post("/api/command").json(&request).send().await?;

        let body: CommandResponse = self.handle_response(response).await?;
        Ok(body.results)
    }
}
