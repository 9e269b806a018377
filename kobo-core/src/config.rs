//! Configuration management
//!
//! `<kobo_dir>/settings.json`:
//! ```json
//! {
//!   "api": { "authBaseUrl": "...", "apiBaseUrl": "..." },
//!   "paystack": { "baseUrl": "...", "country": "nigeria", "currency": "NGN" },
//!   "app": { "recentTransactions": 5 }
//! }
//! ```
//!
//! Environment variables win over the file. The Paystack secret key is only
//! ever read from the environment.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::adapters::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL, DEFAULT_PAYSTACK_BASE_URL};
use crate::domain::money::CURRENCY_CODE;

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_COUNTRY: &str = "nigeria";
pub const DEFAULT_RECENT_TRANSACTIONS: usize = 5;

pub const ENV_AUTH_BASE_URL: &str = "KOBO_AUTH_BASE_URL";
pub const ENV_API_BASE_URL: &str = "KOBO_API_BASE_URL";
pub const ENV_PAYSTACK_BASE_URL: &str = "PAYSTACK_BASE_URL";
pub const ENV_PAYSTACK_SECRET_KEY: &str = "PAYSTACK_SECRET_KEY";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    paystack: PaystackSettings,
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaystackSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recent_transactions: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Kobo configuration (resolved view of settings + environment)
#[derive(Debug)]
pub struct Config {
    pub auth_base_url: String,
    pub api_base_url: String,
    pub paystack_base_url: String,
    pub paystack_country: String,
    pub paystack_currency: String,
    pub paystack_secret_key: Option<SecretString>,
    pub recent_transactions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(&SettingsFile::default(), |_| None)
    }
}

impl Config {
    /// Keys accepted by [`Config::set_value`]
    pub const KEYS: [&'static str; 6] = [
        "api.authBaseUrl",
        "api.apiBaseUrl",
        "paystack.baseUrl",
        "paystack.country",
        "paystack.currency",
        "app.recentTransactions",
    ];

    /// Load config from the kobo directory, applying environment overrides
    pub fn load(kobo_dir: &Path) -> Result<Self> {
        Self::load_with_env(kobo_dir, |key| std::env::var(key).ok())
    }

    /// Load config with an explicit environment lookup
    pub fn load_with_env<F>(kobo_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = read_settings(kobo_dir)?;
        Ok(Self::resolve(&raw, env))
    }

    fn resolve<F>(raw: &SettingsFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        Self {
            auth_base_url: env(ENV_AUTH_BASE_URL)
                .or_else(|| raw.api.auth_base_url.clone())
                .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string()),
            api_base_url: env(ENV_API_BASE_URL)
                .or_else(|| raw.api.api_base_url.clone())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            paystack_base_url: env(ENV_PAYSTACK_BASE_URL)
                .or_else(|| raw.paystack.base_url.clone())
                .unwrap_or_else(|| DEFAULT_PAYSTACK_BASE_URL.to_string()),
            paystack_country: raw
                .paystack
                .country
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            paystack_currency: raw
                .paystack
                .currency
                .clone()
                .unwrap_or_else(|| CURRENCY_CODE.to_string()),
            paystack_secret_key: env(ENV_PAYSTACK_SECRET_KEY).map(SecretString::from),
            recent_transactions: raw
                .app
                .recent_transactions
                .unwrap_or(DEFAULT_RECENT_TRANSACTIONS),
        }
    }

    /// Persist one setting to settings.json
    ///
    /// Preserves every other field, including ones this version doesn't know.
    pub fn set_value(kobo_dir: &Path, key: &str, value: &str) -> Result<()> {
        let mut settings = read_settings(kobo_dir)?;
        let value = value.trim().to_string();

        match key {
            "api.authBaseUrl" => settings.api.auth_base_url = Some(checked_url(&value)?),
            "api.apiBaseUrl" => settings.api.api_base_url = Some(checked_url(&value)?),
            "paystack.baseUrl" => settings.paystack.base_url = Some(checked_url(&value)?),
            "paystack.country" => settings.paystack.country = Some(value.to_lowercase()),
            "paystack.currency" => settings.paystack.currency = Some(value.to_uppercase()),
            "app.recentTransactions" => {
                let count: usize = value
                    .parse()
                    .with_context(|| format!("'{}' is not a whole number", value))?;
                settings.app.recent_transactions = Some(count);
            }
            _ => bail!(
                "Unknown setting '{}'. Valid keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        }

        write_settings(kobo_dir, &settings)
    }

    /// Settings as displayed by `kobo config show` (no secrets)
    pub fn display_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api.authBaseUrl", self.auth_base_url.clone()),
            ("api.apiBaseUrl", self.api_base_url.clone()),
            ("paystack.baseUrl", self.paystack_base_url.clone()),
            ("paystack.country", self.paystack_country.clone()),
            ("paystack.currency", self.paystack_currency.clone()),
            ("app.recentTransactions", self.recent_transactions.to_string()),
            (
                "paystack.secretKey",
                if self.paystack_secret_key.is_some() {
                    format!("set via {}", ENV_PAYSTACK_SECRET_KEY)
                } else {
                    "not set".to_string()
                },
            ),
        ]
    }
}

fn checked_url(value: &str) -> Result<String> {
    url::Url::parse(value).with_context(|| format!("'{}' is not a valid URL", value))?;
    Ok(value.trim_end_matches('/').to_string())
}

fn read_settings(kobo_dir: &Path) -> Result<SettingsFile> {
    let settings_path = kobo_dir.join(SETTINGS_FILE_NAME);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", settings_path.display()))
}

fn write_settings(kobo_dir: &Path, settings: &SettingsFile) -> Result<()> {
    std::fs::create_dir_all(kobo_dir)?;
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(kobo_dir.join(SETTINGS_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_with_env(dir.path(), |_| None).unwrap();
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.paystack_country, "nigeria");
        assert_eq!(config.paystack_currency, "NGN");
        assert_eq!(config.recent_transactions, 5);
        assert!(config.paystack_secret_key.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            r#"{"api": {"apiBaseUrl": "https://file.example"}, "app": {"recentTransactions": 3}}"#,
        )
        .unwrap();

        let config = Config::load_with_env(dir.path(), |key| match key {
            ENV_API_BASE_URL => Some("http://127.0.0.1:9000".to_string()),
            ENV_PAYSTACK_SECRET_KEY => Some("sk_test_x".to_string()),
            ENV_AUTH_BASE_URL => Some("   ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.recent_transactions, 3);
        assert_eq!(
            config.paystack_secret_key.unwrap().expose_secret(),
            "sk_test_x"
        );
    }

    #[test]
    fn test_set_value_preserves_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"theme": "dark", "app": {"recentTransactions": 3, "lastSeen": 12}}"#,
        )
        .unwrap();

        Config::set_value(dir.path(), "paystack.currency", "ngn").unwrap();
        Config::set_value(dir.path(), "app.recentTransactions", "10").unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["app"]["lastSeen"], 12);
        assert_eq!(saved["app"]["recentTransactions"], 10);
        assert_eq!(saved["paystack"]["currency"], "NGN");
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        assert!(Config::set_value(dir.path(), "api.token", "x").is_err());
        assert!(Config::set_value(dir.path(), "api.apiBaseUrl", "not a url").is_err());
        assert!(Config::set_value(dir.path(), "app.recentTransactions", "many").is_err());
    }
}
