//! Command DTOs

use serde::{Deserialize, Serialize};

use crate::domain::command::CommandResult;

/// Body of `POST /api/command`
///
/// `commands` may be a single string or an array of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub commands: Option<CommandInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandInput {
    Single(String),
    Batch(Vec<String>),
}

impl CommandInput {
    /// Flattens the input into the ordered list of commands to run
    pub fn into_commands(self) -> Vec<String> {
        match self {
            CommandInput::Single(command) => vec![command],
            CommandInput::Batch(commands) => commands,
        }
    }
}

/// Response of `POST /api/command`, one result per submitted command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub results: Vec<CommandResult>,
}
