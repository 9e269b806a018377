//! User settings and login sessions

use serde::{Deserialize, Serialize};

use super::de;
use super::resource::{Record, Resource};
use super::result::{Error, Result};

/// Per-channel notification switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPreferences {
    pub transactions: bool,
    pub security: bool,
    pub bills: bool,
    pub promotions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPreferences {
    pub statements: bool,
    pub security: bool,
    pub marketing: bool,
    pub updates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsPreferences {
    pub transactions: bool,
    pub security: bool,
    pub otp: bool,
    pub bills: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub push: PushPreferences,
    pub email: EmailPreferences,
    pub sms: SmsPreferences,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push: PushPreferences {
                transactions: true,
                security: true,
                bills: false,
                promotions: true,
            },
            email: EmailPreferences {
                statements: true,
                security: true,
                marketing: false,
                updates: true,
            },
            sms: SmsPreferences {
                transactions: true,
                security: true,
                otp: true,
                bills: false,
            },
        }
    }
}

/// Settings body without the record id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingValues {
    #[serde(default = "default_true")]
    pub two_factor_auth: bool,
    #[serde(default)]
    pub biometric_login: bool,
    #[serde(default = "default_true")]
    pub sms_alerts: bool,
    #[serde(default = "default_true")]
    pub email_alerts: bool,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

fn default_true() -> bool {
    true
}

impl Default for SettingValues {
    fn default() -> Self {
        Self {
            two_factor_auth: true,
            biometric_login: false,
            sms_alerts: true,
            email_alerts: true,
            notifications: NotificationPreferences::default(),
        }
    }
}

impl SettingValues {
    /// Set a single switch by its dotted key, e.g. `smsAlerts` or `push.bills`
    pub fn set(&mut self, key: &str, value: bool) -> Result<()> {
        let n = &mut self.notifications;
        let slot = match key {
            "twoFactorAuth" => &mut self.two_factor_auth,
            "biometricLogin" => &mut self.biometric_login,
            "smsAlerts" => &mut self.sms_alerts,
            "emailAlerts" => &mut self.email_alerts,
            "push.transactions" => &mut n.push.transactions,
            "push.security" => &mut n.push.security,
            "push.bills" => &mut n.push.bills,
            "push.promotions" => &mut n.push.promotions,
            "email.statements" => &mut n.email.statements,
            "email.security" => &mut n.email.security,
            "email.marketing" => &mut n.email.marketing,
            "email.updates" => &mut n.email.updates,
            "sms.transactions" => &mut n.sms.transactions,
            "sms.security" => &mut n.sms.security,
            "sms.otp" => &mut n.sms.otp,
            "sms.bills" => &mut n.sms.bills,
            other => {
                return Err(Error::validation(format!(
                    "unknown setting '{}'. Available: {}",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        };
        *slot = value;
        Ok(())
    }

    pub const KEYS: [&'static str; 16] = [
        "twoFactorAuth",
        "biometricLogin",
        "smsAlerts",
        "emailAlerts",
        "push.transactions",
        "push.security",
        "push.bills",
        "push.promotions",
        "email.statements",
        "email.security",
        "email.marketing",
        "email.updates",
        "sms.transactions",
        "sms.security",
        "sms.otp",
        "sms.bills",
    ];
}

/// A `user_setting` record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSetting {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(flatten)]
    pub values: SettingValues,
}

impl Record for UserSetting {
    const RESOURCE: Resource = Resource::UserSetting;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A `user_session` record: one signed-in device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub last_active: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Record for UserSession {
    const RESOURCE: Resource = Resource::UserSession;

    fn id(&self) -> &str {
        &self.id
    }
}
