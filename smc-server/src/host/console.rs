//! Built-in console host
//!
//! A small self-contained host used when the server runs standalone. It
//! understands a handful of administrative commands and reports everything
//! through the invoking sender, the way a game server console does.

use smc_core::dto::status::{CommandInfo, PluginInfo};
use std::time::Instant;
use tracing::info;

use super::{CommandHost, HostError, OutputSink};

const UNKNOWN_COMMAND: &str = "Unknown command. Type \"help\" for help.";

/// Console host with a fixed command table
pub struct ConsoleHost {
    version: String,
    started_at: Instant,
}

impl ConsoleHost {
    /// # Arguments
    /// * `version` - Version string the host reports (e.g. "1.20.4-R0.1-SNAPSHOT")
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            started_at: Instant::now(),
        }
    }

    fn help(&self, sender: &mut dyn OutputSink) {
        sender.send_message("--------- Help: Index ---------");
        for command in self.commands() {
            sender.send_message(&format!("/{}: {}", command.name, command.description));
        }
    }

    fn uptime(&self) -> String {
        let elapsed = self.started_at.elapsed().as_secs();
        format!(
            "Uptime: {}h {}m {}s",
            elapsed / 3600,
            (elapsed % 3600) / 60,
            elapsed % 60
        )
    }
}

impl CommandHost for ConsoleHost {
    fn dispatch(&mut self, sender: &mut dyn OutputSink, command: &str) -> Result<bool, HostError> {
        let command = command.trim();
        let (label, args) = match command.split_once(char::is_whitespace) {
            Some((label, args)) => (label, args.trim()),
            None => (command, ""),
        };

        match label.to_lowercase().as_str() {
            "help" | "?" => {
                self.help(sender);
                Ok(true)
            }
            "echo" => {
                if args.is_empty() {
                    sender.send_message("Usage: /echo <text>");
                    return Ok(false);
                }
                sender.send_message(args);
                Ok(true)
            }
            "say" => {
                if args.is_empty() {
                    sender.send_message("Usage: /say <message>");
                    return Ok(false);
                }
                info!(target: "Server", "[Server] {}", args);
                sender.send_message(&format!("[Server] {}", args));
                Ok(true)
            }
            "version" | "ver" => {
                sender.send_message(&format!("This server is running {}", self.version));
                Ok(true)
            }
            "uptime" => {
                sender.send_message(&self.uptime());
                Ok(true)
            }
            _ => {
                sender.send_message(UNKNOWN_COMMAND);
                Ok(false)
            }
        }
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn commands(&self) -> Vec<CommandInfo> {
        let command = |name: &str, description: &str, usage: &str, aliases: &[&str]| CommandInfo {
            name: name.to_string(),
            description: description.to_string(),
            usage: usage.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
            plugin: "Server".to_string(),
        };

        vec![
            command("help", "Shows the help menu", "/help", &["?"]),
            command("echo", "Repeats the given text back", "/echo <text>", &[]),
            command("say", "Broadcasts a message to the server", "/say <message>", &[]),
            command("version", "Shows the server version", "/version", &["ver"]),
            command("uptime", "Shows how long the server has been running", "/uptime", &[]),
        ]
    }

    // The console is its own only plugin and never has players connected
    fn plugins(&self) -> Vec<PluginInfo> {
        vec![PluginInfo {
            name: "Server".to_string(),
            version: self.version.clone(),
            enabled: true,
            authors: Vec::new(),
        }]
    }
}
