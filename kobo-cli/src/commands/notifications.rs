//! Notifications command

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum NotificationsCommands {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark one notification (or all with --all) as read
    Read {
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Delete a notification
    Delete { id: String },
}

pub fn run(command: NotificationsCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.notification_service;

    match command {
        NotificationsCommands::List { unread, json } => {
            let mut items = service.list()?;
            if unread {
                items.retain(|n| !n.read);
            }
            if json {
                return output::json(&items);
            }
            if items.is_empty() {
                println!("No notifications.");
                return Ok(());
            }

            for n in &items {
                let marker = if n.read { " ".normal() } else { "●".blue() };
                println!(
                    "{} {}  {}",
                    marker,
                    n.title.bold(),
                    output::format_timestamp(n.created_at).dimmed()
                );
                if !n.message.is_empty() {
                    println!("    {}", n.message);
                }
                println!("    {}", format!("id: {}", n.id).dimmed());
            }
        }
        NotificationsCommands::Read { id, all } => {
            if all {
                let count = service.mark_all_read()?;
                output::success(&format!("Marked {} notifications as read", count));
            } else {
                let id = id.ok_or_else(|| anyhow::anyhow!("Give a notification ID or --all"))?;
                service.mark_read(&id)?;
                output::success("Marked as read");
            }
        }
        NotificationsCommands::Delete { id } => {
            service.delete(&id)?;
            output::success(&format!("Deleted notification {}", id));
        }
    }

    Ok(())
}
