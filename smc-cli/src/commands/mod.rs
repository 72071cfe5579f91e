//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod logs;
mod server;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show server status and version
    Status,
    /// Execute one or more commands, in order
    Exec {
        /// Commands to run (quote commands that contain spaces)
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// List the commands the server can run
    Commands,
    /// List loaded plugins
    Plugins,
    /// List online players
    Players,
    /// Show recent log entries
    Logs {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 100)]
        limit: i64,
        /// Only entries from the last N minutes
        #[arg(short, long)]
        since_minutes: Option<i64>,
    },
    /// Show recent errors
    Errors {
        /// Only entries whose source contains this text
        #[arg(short, long)]
        plugin: Option<String>,
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
    /// Show recent warnings
    Warnings {
        /// Only entries whose source contains this text
        #[arg(short, long)]
        plugin: Option<String>,
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        Commands::Status => server::show_status(&client).await,
        Commands::Exec { commands } => server::execute(&client, &commands).await,
        Commands::Commands => server::list_commands(&client).await,
        Commands::Plugins => server::list_plugins(&client).await,
        Commands::Players => server::list_players(&client).await,
        Commands::Logs {
            limit,
            since_minutes,
        } => logs::show_logs(&client, limit, since_minutes).await,
        Commands::Errors { plugin, limit } => {
            logs::show_errors(&client, plugin.as_deref(), limit).await
        }
        Commands::Warnings { plugin, limit } => {
            logs::show_warnings(&client, plugin.as_deref(), limit).await
        }
    }
}
