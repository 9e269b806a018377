//! SQL for `logs.duckdb`, applied in order and recorded in `log_schema`

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[("001_event_log", include_str!("001_event_log.sql"))];
