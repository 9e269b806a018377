//! Logs command - inspect, prune and export the local event log

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use kobo_core::services::{LogEntry, LoggingService, Surface};

use super::{approval, get_kobo_dir, Approval};
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Recent events, newest first
    List {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only failed actions
        #[arg(long)]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f', visible_alias = "yes")]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Totals per action
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the log as CSV, e.g. to attach to a support request
    Export { out: PathBuf },
}

fn outcome_label(entry: &LogEntry) -> String {
    match entry.outcome.as_str() {
        "failed" => entry.outcome.red().to_string(),
        "succeeded" if entry.warnings > 0 => {
            format!("{} ({} warnings)", entry.outcome.yellow(), entry.warnings)
        }
        "succeeded" => entry.outcome.green().to_string(),
        _ => entry.outcome.dimmed().to_string(),
    }
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = LoggingService::open(&get_kobo_dir()?, Surface::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List {
            limit,
            failures,
            json,
        } => {
            let entries = log.recent(limit, failures)?;
            if json {
                return output::json(&entries);
            }
            if entries.is_empty() {
                output::info("The event log is empty.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Action", "Outcome", "Via", "Reason"]);
            for entry in &entries {
                table.add_row(vec![
                    output::format_timestamp(Some(entry.logged_at)),
                    entry.command.clone().unwrap_or_else(|| entry.action.clone()),
                    outcome_label(entry),
                    entry.channel.clone().unwrap_or_default(),
                    entry.reason.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let approval = approval(force, json)?;
            let cutoff = Utc::now() - Duration::days(older_than_days);
            let confirmed = approval == Approval::Given
                || Confirm::new()
                    .with_prompt(format!(
                        "Delete events from before {}?",
                        cutoff.format("%Y-%m-%d")
                    ))
                    .default(false)
                    .interact()?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }

            let removed = log.prune_before(cutoff.timestamp_millis())?;
            if json {
                return output::json(serde_json::json!({ "deleted": removed }));
            }
            output::success(&format!("Deleted {} events", removed));
        }
        LogsCommands::Stats { json } => {
            let summary = log.summary()?;
            let total = log.count()?;
            let size = std::fs::metadata(log.db_path()).map(|m| m.len()).ok();

            if json {
                return output::json(serde_json::json!({
                    "total": total,
                    "actions": summary,
                    "path": log.db_path(),
                    "size_bytes": size,
                }));
            }

            println!("{} events in {}", total.to_string().bold(), log.db_path().display());
            if summary.is_empty() {
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["Action", "Total", "Failed", "Last"]);
            for row in summary {
                let failed = if row.failures > 0 {
                    row.failures.to_string().red().to_string()
                } else {
                    "0".to_string()
                };
                table.add_row(vec![
                    row.action,
                    row.total.to_string(),
                    failed,
                    output::format_timestamp(Some(row.last_seen)),
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Export { out } => {
            log.export_csv(&out)?;
            output::success(&format!("Event log written to {}", out.display()));
        }
    }

    Ok(())
}
