//! PIN command - manage the transaction PIN

use anyhow::{Context, Result};
use clap::Subcommand;
use kobo_core::domain::Credentials;
use kobo_core::services::LogEvent;

use super::{get_context, get_logger, log_event, secret_or_prompt};
use crate::output;

#[derive(Subcommand)]
pub enum PinCommands {
    /// Set or change the 4-digit transaction PIN
    Set,
    /// Remove the PIN (asks for your account password)
    Clear,
    /// Show whether a PIN is set
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: PinCommands) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    match command {
        PinCommands::Set => {
            if ctx.pin_service.is_set()? {
                let current = secret_or_prompt("KOBO_PIN", "Current PIN")?;
                ctx.pin_service.require(&current)?;
            }
            let pin = secret_or_prompt("KOBO_NEW_PIN", "New PIN (4 digits)")?;
            let confirm = secret_or_prompt("KOBO_NEW_PIN", "Confirm PIN")?;
            ctx.pin_service.set(&pin, &confirm)?;
            log_event(&logger, LogEvent::succeeded("pin_set").from_command("pin set"));
            output::success("Transaction PIN saved.");
        }
        PinCommands::Clear => {
            let user = ctx.auth_service.me()?;
            let email = user
                .email
                .context("Your account has no e-mail address to re-authenticate with")?;
            let password = secret_or_prompt("KOBO_PASSWORD", "Account password")?;
            ctx.auth_service
                .login(&Credentials::new(email, password))
                .context("Re-authentication failed")?;
            ctx.pin_service.clear()?;
            log_event(&logger, LogEvent::succeeded("pin_clear").from_command("pin clear"));
            output::success("Transaction PIN removed. Run 'kobo pin set' to choose a new one.");
        }
        PinCommands::Status { json } => {
            let status = ctx.pin_service.status()?;
            if json {
                return output::json(&status);
            }
            if status.configured {
                output::success(&format!(
                    "Transaction PIN is set (since {}).",
                    output::format_timestamp(status.set_at)
                ));
            } else {
                output::warning("No transaction PIN set. Run 'kobo pin set'.");
            }
        }
    }

    Ok(())
}
