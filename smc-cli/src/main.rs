//! SMC CLI
//!
//! Command-line interface for interacting with an SMC server.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "smc")]
#[command(about = "Server Management Console CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "SMC_URL", default_value = "http://localhost:8080")]
    url: String,

    /// API key configured on the server
    #[arg(long, env = "SMC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.url,
        api_key: cli.api_key,
        timeout_seconds: cli.timeout,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_exec_batch() {
        let cli = Cli::try_parse_from([
            "smc",
            "--api-key",
            "secret",
            "exec",
            "say hello",
            "list",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://localhost:8080");
        match cli.command {
            Commands::Exec { commands } => assert_eq!(commands, vec!["say hello", "list"]),
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_exec_requires_a_command() {
        assert!(Cli::try_parse_from(["smc", "--api-key", "secret", "exec"]).is_err());
    }

    #[test]
    fn test_parse_errors_filters() {
        let cli = Cli::try_parse_from([
            "smc",
            "--api-key",
            "secret",
            "errors",
            "--plugin",
            "WorldEdit",
            "--limit",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Errors { plugin, limit } => {
                assert_eq!(plugin.as_deref(), Some("WorldEdit"));
                assert_eq!(limit, 5);
            }
            _ => panic!("expected errors"),
        }
    }

    #[test]
    fn test_parse_plugins_and_players() {
        let cli = Cli::try_parse_from(["smc", "--api-key", "secret", "plugins"]).unwrap();
        assert!(matches!(cli.command, Commands::Plugins));

        let cli = Cli::try_parse_from(["smc", "--api-key", "secret", "players"]).unwrap();
        assert!(matches!(cli.command, Commands::Players));
    }
}
