//! Log command handlers

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use colored::*;
use smc_client::SmcClient;
use smc_core::domain::log::{LogEntry, level};
use smc_core::dto::log::LogsQuery;

/// Show recent log entries
pub async fn show_logs(client: &SmcClient, limit: i64, since_minutes: Option<i64>) -> Result<()> {
    let query = LogsQuery {
        limit: Some(limit),
        start_time: since_minutes.map(|minutes| since(Utc::now(), minutes).timestamp_millis()),
        end_time: None,
    };

    let logs = client.logs(&query).await?;
    print_entries(&logs, "No log entries found.");
    Ok(())
}

/// Show recent errors
pub async fn show_errors(client: &SmcClient, plugin: Option<&str>, limit: i64) -> Result<()> {
    let errors = client.errors(plugin, Some(limit)).await?;
    print_entries(&errors, "No errors found.");
    Ok(())
}

/// Show recent warnings
pub async fn show_warnings(client: &SmcClient, plugin: Option<&str>, limit: i64) -> Result<()> {
    let warnings = client.warnings(plugin, Some(limit)).await?;
    print_entries(&warnings, "No warnings found.");
    Ok(())
}

/// Start of a "last N minutes" window ending at `now`
fn since(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    let window = TimeDelta::try_minutes(minutes.max(0)).unwrap_or(TimeDelta::MAX);
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Prints entries oldest first, so the newest ends up at the bottom
fn print_entries(entries: &[LogEntry], empty_message: &str) {
    if entries.is_empty() {
        println!("{}", empty_message.yellow());
        return;
    }

    for entry in entries.iter().rev() {
        println!(
            "{} {} {} {}",
            entry
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed(),
            colorize_level(&entry.level),
            format!("[{}]", entry.source).cyan(),
            entry.message
        );
    }
}

/// Colorize a log level for display
fn colorize_level(raw: &str) -> ColoredString {
    let label = format!("{:<5}", raw.to_uppercase());
    match raw.to_uppercase().as_str() {
        level::ERROR => label.red().bold(),
        level::WARN | level::WARNING => label.yellow(),
        level::INFO => label.green(),
        _ => label.dimmed(),
    }
}
