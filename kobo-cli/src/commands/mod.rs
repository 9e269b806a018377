//! CLI command implementations

pub mod auth;
pub mod banks;
pub mod bills;
pub mod cards;
pub mod config;
pub mod fund;
pub mod help_center;
pub mod logs;
pub mod notifications;
pub mod pin;
pub mod settings;
pub mod status;
pub mod transactions;
pub mod transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use kobo_core::services::{LogEvent, LoggingService, Surface};
use kobo_core::KoboContext;
use tracing::debug;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let kobo_dir = get_kobo_dir().ok()?;
    std::fs::create_dir_all(&kobo_dir).ok()?;
    LoggingService::open(&kobo_dir, Surface::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.record(event);
    }
}

/// Get the kobo directory from environment or default
pub fn get_kobo_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("KOBO_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".kobo"))
        .context("Could not find home directory. Set KOBO_DIR.")
}

/// Get or create kobo context
pub fn get_context() -> Result<KoboContext> {
    let kobo_dir = get_kobo_dir()?;

    std::fs::create_dir_all(&kobo_dir)
        .with_context(|| format!("Failed to create kobo directory: {:?}", kobo_dir))?;

    debug!(dir = %kobo_dir.display(), "opening kobo context");
    KoboContext::new(&kobo_dir).context("Failed to initialize kobo context")
}

/// Use the flag value, else prompt for it
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

/// Read a secret from an environment variable, else prompt without echo
pub fn secret_or_prompt(env_var: &str, prompt: &str) -> Result<String> {
    if let Ok(value) = std::env::var(env_var) {
        return Ok(value);
    }
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("{} is not set and stdin is not a terminal", env_var);
    }
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// How a money-moving or destructive command gets the user's go-ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    /// `--yes` was passed
    Given,
    /// Show a summary and ask
    Prompt,
}

/// `--json` alone never moves money or deletes data; it needs `--yes` as well
pub fn approval(yes: bool, json: bool) -> Result<Approval> {
    if yes {
        return Ok(Approval::Given);
    }
    if json {
        anyhow::bail!("--json cannot ask for confirmation. Pass --yes to confirm.");
    }
    Ok(Approval::Prompt)
}

/// Read the transaction PIN (`KOBO_PIN` or prompt) and check it
pub fn require_pin(ctx: &KoboContext) -> Result<()> {
    if !ctx.pin_service.is_set()? {
        anyhow::bail!("No transaction PIN set. Run 'kobo pin set' first.");
    }
    let pin = secret_or_prompt("KOBO_PIN", "Transaction PIN")?;
    ctx.pin_service.require(&pin)
}
