//! Terminal output: coloured messages, tables, money and `--json` envelopes

use chrono::{TimeZone, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use kobo_core::domain::money;
use kobo_core::OperationResult;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Condensed UTF-8 table that wraps to the terminal width
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print `data` wrapped in a successful `OperationResult`
pub fn json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
    Ok(())
}

/// Print a failed `OperationResult` for a command run with `--json`
pub fn json_failure(err: &anyhow::Error) {
    let envelope: OperationResult<()> = match err.downcast_ref::<kobo_core::Error>() {
        Some(core) => core.into(),
        None => OperationResult::failed("cli", format!("{:#}", err)),
    };
    match serde_json::to_string_pretty(&envelope) {
        Ok(text) => println!("{}", text),
        Err(_) => eprintln!("{} {:#}", "Error:".red(), err),
    }
}

pub fn naira(amount: Decimal) -> String {
    money::format_naira(amount)
}

/// Signed and coloured: debits red, credits green
pub fn signed_naira(amount: Decimal) -> String {
    if amount.is_sign_negative() {
        money::format_naira(amount).red().to_string()
    } else {
        format!("+{}", money::format_naira(amount)).green().to_string()
    }
}

/// Unix milliseconds as `2024-01-01 10:00`
pub fn format_timestamp(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
