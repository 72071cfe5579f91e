//! Status and command-listing DTOs

use serde::{Deserialize, Serialize};

use crate::version::VersionChannel;

/// Response of `GET /api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub online: bool,
    /// Version string exactly as the host reports it
    pub server_version: String,
    /// Numeric part of the host version (e.g. "1.20.4")
    pub host_version: String,
    /// Version of this server build
    pub plugin_version: String,
    pub version_channel: VersionChannel,
}

/// A command the host knows how to dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub usage: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Component that registered the command
    pub plugin: String,
}

/// Response of `GET /api/commands`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsResponse {
    pub commands: Vec<CommandInfo>,
    pub count: usize,
}

impl From<Vec<CommandInfo>> for CommandsResponse {
    fn from(commands: Vec<CommandInfo>) -> Self {
        CommandsResponse {
            count: commands.len(),
            commands,
        }
    }
}

/// A plugin (component) loaded into the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub enabled: bool,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Response of `GET /api/plugins`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsResponse {
    pub plugins: Vec<PluginInfo>,
}

/// A player currently connected to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub uuid: String,
    /// Round-trip latency in milliseconds, -1 when the host cannot tell
    pub ping: i32,
}

/// Response of `GET /api/players`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub count: usize,
    pub players: Vec<PlayerInfo>,
}

impl From<Vec<PlayerInfo>> for PlayersResponse {
    fn from(players: Vec<PlayerInfo>) -> Self {
        PlayersResponse {
            count: players.len(),
            players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_response_counts() {
        let response = PlayersResponse::from(vec![PlayerInfo {
            name: "Steve".to_string(),
            uuid: "069a79f4-44e9-4726-a5be-fca90e38aaf5".to_string(),
            ping: 42,
        }]);
        assert_eq!(response.count, 1);
    }

    #[test]
    fn test_plugin_authors_default_to_empty() {
        let plugin: PluginInfo =
            serde_json::from_str(r#"{"name":"Server","version":"1.0","enabled":true}"#).unwrap();
        assert!(plugin.authors.is_empty());
        assert!(plugin.enabled);
    }
}
