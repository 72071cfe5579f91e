//! Server command handlers
//!
//! Status, command listing and command execution.

use anyhow::{Result, bail};
use colored::*;
use smc_client::SmcClient;
use smc_core::domain::command::CommandResult;
use smc_core::version::VersionChannel;

/// Show server status
pub async fn show_status(client: &SmcClient) -> Result<()> {
    let status = client.status().await?;

    let online = if status.online {
        "online".green()
    } else {
        "offline".red()
    };

    println!("{}", "Server status".bold());
    println!("  Status:       {}", online);
    println!("  Version:      {}", status.server_version);
    println!(
        "  Channel:      {} ({})",
        colorize_channel(status.version_channel),
        status.host_version.dimmed()
    );
    println!("  SMC:          {}", status.plugin_version.dimmed());

    Ok(())
}

/// List available commands
pub async fn list_commands(client: &SmcClient) -> Result<()> {
    let response = client.commands().await?;

    if response.commands.is_empty() {
        println!("{}", "No commands available.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} command(s):", response.count).bold()
    );
    println!();
    for command in &response.commands {
        println!("  {} /{}", "▸".cyan(), command.name.bold());
        if !command.description.is_empty() {
            println!("    {}", command.description);
        }
        println!("    Usage:   {}", command.usage.dimmed());
        if !command.aliases.is_empty() {
            println!("    Aliases: {}", command.aliases.join(", ").dimmed());
        }
    }

    Ok(())
}

/// List loaded plugins
pub async fn list_plugins(client: &SmcClient) -> Result<()> {
    let plugins = client.plugins().await?;

    if plugins.is_empty() {
        println!("{}", "No plugins loaded.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} plugin(s):", plugins.len()).bold());
    println!();
    for plugin in &plugins {
        let state = if plugin.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!(
            "  {} {} {} [{}]",
            "▸".cyan(),
            plugin.name.bold(),
            plugin.version.dimmed(),
            state
        );
        if !plugin.authors.is_empty() {
            println!("    Authors: {}", plugin.authors.join(", "));
        }
    }

    Ok(())
}

/// List online players
pub async fn list_players(client: &SmcClient) -> Result<()> {
    let response = client.players().await?;

    if response.players.is_empty() {
        println!("{}", "No players online.".yellow());
        return Ok(());
    }

    println!("{}", format!("{} player(s) online:", response.count).bold());
    println!();
    for player in &response.players {
        println!(
            "  {} {} ({}) {}",
            "▸".cyan(),
            player.name.bold(),
            player.uuid.dimmed(),
            format_ping(player.ping)
        );
    }

    Ok(())
}

/// Ping in ms; negative means the server could not tell
fn format_ping(ping: i32) -> String {
    if ping < 0 {
        "ping unknown".to_string()
    } else {
        format!("{}ms", ping)
    }
}

/// Execute commands in order and print each result
///
/// Fails if any command failed, after printing all results.
pub async fn execute(client: &SmcClient, commands: &[String]) -> Result<()> {
    let results = client.execute_batch(commands).await?;

    for result in &results {
        print_result(result);
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        bail!("{} of {} command(s) failed", failed, results.len());
    }

    Ok(())
}

fn print_result(result: &CommandResult) {
    if result.is_success() {
        println!("{} {}", "✓".green(), result.command().bold());
        for line in result.output().lines() {
            println!("    {}", line);
        }
    } else {
        println!(
            "{} {}: {}",
            "✗".red(),
            result.command().bold(),
            result.error().unwrap_or("Unknown error").red()
        );
    }
}

/// Colorize the version channel for display
fn colorize_channel(channel: VersionChannel) -> ColoredString {
    let label = channel.to_string();
    match channel {
        VersionChannel::Modern => label.green(),
        VersionChannel::Legacy => label.yellow(),
        VersionChannel::Unsupported => label.red(),
    }
}
