//! Local event log in `logs.duckdb`
//!
//! Each row says what was attempted (`action`), how it ended (`outcome`) and
//! which remote system was involved. Amounts, balances, account numbers,
//! names and tokens are never stored; failure reasons are passed through
//! [`scrub`] first.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use anyhow::{anyhow, Context, Result};
use duckdb::{params, Connection, Row};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::money::now_ms;
use crate::log_migrations::LOG_MIGRATIONS;

pub const LOGS_DB_NAME: &str = "logs.duckdb";

/// Mask digit runs (account numbers, amounts, phone numbers)
pub fn scrub(text: &str) -> String {
    static DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    match DIGITS.get_or_init(|| Regex::new(r"[₦]?\d[\d,.]{2,}").ok()) {
        Some(re) => re.replace_all(text, "***").into_owned(),
        None => text.to_string(),
    }
}

/// Front end that produced the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Cli,
    Library,
}

impl Surface {
    fn label(self) -> &'static str {
        match self {
            Surface::Cli => "cli",
            Surface::Library => "library",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Started,
    Succeeded,
    Failed,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Started => "started",
            Outcome::Succeeded => "succeeded",
            Outcome::Failed => "failed",
        }
    }
}

/// Remote system an action went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Xano,
    Paystack,
}

impl Channel {
    fn label(self) -> &'static str {
        match self {
            Channel::Xano => "xano",
            Channel::Paystack => "paystack",
        }
    }
}

/// One thing that happened, before it is stamped and stored
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub action: String,
    pub outcome: Outcome,
    pub channel: Option<Channel>,
    pub command: Option<String>,
    pub reason: Option<String>,
    pub warnings: u32,
}

impl LogEvent {
    fn with_outcome(action: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            action: action.into(),
            outcome,
            channel: None,
            command: None,
            reason: None,
            warnings: 0,
        }
    }

    pub fn started(action: impl Into<String>) -> Self {
        Self::with_outcome(action, Outcome::Started)
    }

    pub fn succeeded(action: impl Into<String>) -> Self {
        Self::with_outcome(action, Outcome::Succeeded)
    }

    pub fn failed(action: impl Into<String>, reason: impl fmt::Display) -> Self {
        let mut event = Self::with_outcome(action, Outcome::Failed);
        event.reason = Some(reason.to_string());
        event
    }

    pub fn via(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// CLI command line that triggered the action, e.g. `"bills pay"`
    pub fn from_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Number of non-fatal problems reported alongside a success
    pub fn with_warnings(mut self, count: usize) -> Self {
        self.warnings = u32::try_from(count).unwrap_or(u32::MAX);
        self
    }
}

/// A stored row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub logged_at: i64,
    pub surface: String,
    pub version: String,
    pub os: String,
    pub action: String,
    pub outcome: String,
    pub channel: Option<String>,
    pub command: Option<String>,
    pub reason: Option<String>,
    pub warnings: i32,
}

impl LogEntry {
    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failed.label()
    }
}

/// Totals for one action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSummary {
    pub action: String,
    pub total: i64,
    pub failures: i64,
    pub last_seen: i64,
}

const SELECT_ENTRY: &str = "SELECT id, logged_at, surface, version, os, action, outcome, \
                            channel, command, reason, warnings FROM event_log";

impl TryFrom<&Row<'_>> for LogEntry {
    type Error = duckdb::Error;

    fn try_from(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            logged_at: row.get("logged_at")?,
            surface: row.get("surface")?,
            version: row.get("version")?,
            os: row.get("os")?,
            action: row.get("action")?,
            outcome: row.get("outcome")?,
            channel: row.get("channel")?,
            command: row.get("command")?,
            reason: row.get("reason")?,
            warnings: row.get("warnings")?,
        })
    }
}

/// Writer and reader for the event log
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    surface: Surface,
    version: String,
}

impl LoggingService {
    /// Open `logs.duckdb` under `kobo_dir`, creating and migrating it as needed
    pub fn open(kobo_dir: &Path, surface: Surface, version: impl Into<String>) -> Result<Self> {
        std::fs::create_dir_all(kobo_dir)
            .with_context(|| format!("Failed to create {}", kobo_dir.display()))?;
        let db_path = kobo_dir.join(LOGS_DB_NAME);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            surface,
            version: version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("event log connection poisoned"))
    }

    pub fn record(&self, event: LogEvent) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO event_log (logged_at, surface, version, os, action, outcome, \
             channel, command, reason, warnings) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                now_ms(),
                self.surface.label(),
                self.version,
                std::env::consts::OS,
                event.action,
                event.outcome.label(),
                event.channel.map(Channel::label),
                event.command,
                event.reason.as_deref().map(scrub),
                event.warnings,
            ],
        )?;
        Ok(())
    }

    /// Newest first; `failures_only` keeps rows whose outcome is `failed`
    pub fn recent(&self, limit: usize, failures_only: bool) -> Result<Vec<LogEntry>> {
        let filter = if failures_only {
            " WHERE outcome = 'failed'"
        } else {
            ""
        };
        let sql = format!("{SELECT_ENTRY}{filter} ORDER BY logged_at DESC, id DESC LIMIT ?");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], |row| LogEntry::try_from(row))?;
        Ok(rows.collect::<duckdb::Result<_>>()?)
    }

    /// Per-action totals, busiest first
    pub fn summary(&self) -> Result<Vec<ActionSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT action, COUNT(*), COUNT(*) FILTER (WHERE outcome = 'failed'), MAX(logged_at) \
             FROM event_log GROUP BY action ORDER BY 2 DESC, action",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ActionSummary {
                action: row.get(0)?,
                total: row.get(1)?,
                failures: row.get(2)?,
                last_seen: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<duckdb::Result<_>>()?)
    }

    pub fn count(&self) -> Result<i64> {
        let total = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM event_log", [], |row| row.get(0))?;
        Ok(total)
    }

    /// Remove rows logged before `cutoff_ms`; returns how many went
    pub fn prune_before(&self, cutoff_ms: i64) -> Result<usize> {
        let removed = self
            .conn()?
            .execute("DELETE FROM event_log WHERE logged_at < ?", [cutoff_ms])?;
        Ok(removed)
    }

    /// Write every row to a CSV file with a header line
    pub fn export_csv(&self, out: &Path) -> Result<()> {
        let target = out.to_string_lossy().replace('\'', "''");
        self.conn()?
            .execute_batch(&format!(
                "COPY ({SELECT_ENTRY} ORDER BY logged_at, id) TO '{target}' (HEADER, DELIMITER ',')"
            ))
            .with_context(|| format!("Failed to export event log to {}", out.display()))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS log_schema (
            name VARCHAR PRIMARY KEY,
            applied_at TIMESTAMP DEFAULT current_timestamp
        )",
    )?;

    for (name, sql) in LOG_MIGRATIONS {
        let applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM log_schema WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;
        if applied {
            continue;
        }
        conn.execute_batch(sql)
            .with_context(|| format!("Event log migration {name} failed"))?;
        conn.execute("INSERT INTO log_schema (name) VALUES (?)", [name])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> LoggingService {
        LoggingService::open(dir.path(), Surface::Cli, "0.1.0").unwrap()
    }

    #[test]
    fn reopening_skips_applied_migrations() {
        let dir = TempDir::new().unwrap();
        let log = open(&dir);
        log.record(LogEvent::succeeded("logout")).unwrap();
        drop(log);

        let log = open(&dir);
        assert_eq!(log.count().unwrap(), 1);
    }

    #[test]
    fn records_channel_command_and_surface() {
        let dir = TempDir::new().unwrap();
        let log = LoggingService::open(dir.path(), Surface::Library, "0.1.0").unwrap();

        log.record(
            LogEvent::succeeded("transfer")
                .via(Channel::Paystack)
                .from_command("transfer")
                .with_warnings(2),
        )
        .unwrap();

        let rows = log.recent(10, false).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, "transfer");
        assert_eq!(rows[0].outcome, "succeeded");
        assert_eq!(rows[0].channel.as_deref(), Some("paystack"));
        assert_eq!(rows[0].surface, "library");
        assert_eq!(rows[0].warnings, 2);
        assert!(!rows[0].is_failure());
    }

    #[test]
    fn unbounded_limit_returns_everything() {
        let dir = TempDir::new().unwrap();
        let log = open(&dir);
        log.record(LogEvent::succeeded("status")).unwrap();
        log.record(LogEvent::succeeded("logout")).unwrap();

        assert_eq!(log.recent(usize::MAX, false).unwrap().len(), 2);
    }

    #[test]
    fn failure_reasons_lose_account_numbers_and_amounts() {
        let dir = TempDir::new().unwrap();
        let log = open(&dir);

        log.record(LogEvent::started("transfer")).unwrap();
        log.record(LogEvent::failed(
            "transfer",
            "Could not resolve 0123456789 for ₦15,000.50",
        ))
        .unwrap();

        let failures = log.recent(10, true).unwrap();
        assert_eq!(failures.len(), 1);
        let reason = failures[0].reason.as_deref().unwrap();
        assert!(!reason.contains("0123456789"));
        assert!(!reason.contains("15,000"));
        assert!(failures[0].is_failure());
    }

    #[test]
    fn summary_groups_by_action_and_prune_empties_the_log() {
        let dir = TempDir::new().unwrap();
        let log = open(&dir);

        log.record(LogEvent::succeeded("status")).unwrap();
        log.record(LogEvent::succeeded("status")).unwrap();
        log.record(LogEvent::failed("login", "Invalid credentials").via(Channel::Xano))
            .unwrap();

        let summary = log.summary().unwrap();
        assert_eq!(summary[0].action, "status");
        assert_eq!(summary[0].total, 2);
        let login = summary.iter().find(|s| s.action == "login").unwrap();
        assert_eq!(login.failures, 1);

        assert_eq!(log.prune_before(now_ms() + 1000).unwrap(), 3);
        assert_eq!(log.count().unwrap(), 0);
    }

    #[test]
    fn export_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let log = open(&dir);
        log.record(LogEvent::succeeded("logout").from_command("logout"))
            .unwrap();

        let out = dir.path().join("events.csv");
        log.export_csv(&out).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,logged_at,surface"));
        assert!(lines.next().unwrap().contains("logout"));
    }
}
