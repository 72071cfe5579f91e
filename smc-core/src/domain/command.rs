//! Command domain types

use serde::{Deserialize, Serialize};

/// Outcome of executing one command against the host
///
/// A result is either a success carrying captured output, or a failure
/// carrying a reason and no output. The constructors are the only way to
/// build one, so the two states never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommandResultWire")]
pub struct CommandResult {
    command: String,
    success: bool,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CommandResult {
    pub fn success(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(command: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// The command text exactly as submitted
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Captured output, empty on failure
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Failure reason, `None` on success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl std::fmt::Display for CommandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            None => write!(f, "{} -> ok: {}", self.command, self.output),
            Some(error) => write!(f, "{} -> failed: {}", self.command, error),
        }
    }
}

#[derive(Deserialize)]
struct CommandResultWire {
    command: String,
    success: bool,
    #[serde(default)]
    output: String,
    #[serde(default)]
    error: Option<String>,
}

impl From<CommandResultWire> for CommandResult {
    fn from(wire: CommandResultWire) -> Self {
        if wire.success {
            CommandResult::success(wire.command, wire.output)
        } else {
            let error = wire
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            CommandResult::failure(wire.command, error)
        }
    }
}

/// Result of validating a command before execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Rejection reason, `None` when valid
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_error() {
        let result = CommandResult::success("list", "There are 0 players online");
        assert!(result.is_success());
        assert_eq!(result.error(), None);
        assert_eq!(result.output(), "There are 0 players online");
    }

    #[test]
    fn test_failure_has_empty_output() {
        let result = CommandResult::failure("stop", "Command is blacklisted");
        assert!(!result.is_success());
        assert_eq!(result.output(), "");
        assert_eq!(result.error(), Some("Command is blacklisted"));
    }

    #[test]
    fn test_success_omits_error_field() {
        let json = serde_json::to_value(CommandResult::success("help", "ok")).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_deserialize_normalizes_inconsistent_payload() {
        let result: CommandResult = serde_json::from_str(
            r#"{"command":"x","success":false,"output":"leftover"}"#,
        )
        .unwrap();
        assert!(!result.is_success());
        assert_eq!(result.output(), "");
        assert_eq!(result.error(), Some("Unknown error"));
    }

    #[test]
    fn test_validation_outcome_reason() {
        assert!(ValidationOutcome::Valid.is_valid());
        assert_eq!(ValidationOutcome::Valid.reason(), None);

        let invalid = ValidationOutcome::Invalid("Command cannot be empty".to_string());
        assert!(!invalid.is_valid());
        assert_eq!(invalid.reason(), Some("Command cannot be empty"));
    }
}
