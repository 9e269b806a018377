//! Settings service - security/notification preferences and device sessions
//!
//! The user has at most one `user_setting` record. Until it exists the
//! defaults apply, and the first save creates it.

use serde::Serialize;

use super::resource::ResourceService;
use super::session::Session;
use crate::domain::result::Result;
use crate::domain::{SettingValues, UserSession, UserSetting};

/// Preferences plus the id of the record they came from, if any
#[derive(Debug, Clone, Serialize)]
pub struct LoadedSettings {
    pub id: Option<String>,
    pub values: SettingValues,
}

pub struct SettingsService {
    settings: ResourceService<UserSetting>,
    sessions: ResourceService<UserSession>,
}

impl SettingsService {
    pub fn new(session: Session) -> Self {
        Self {
            settings: ResourceService::new(session.clone()),
            sessions: ResourceService::new(session),
        }
    }

    pub fn load(&self) -> Result<LoadedSettings> {
        Ok(match self.settings.list()?.into_iter().next() {
            Some(record) => LoadedSettings {
                id: Some(record.id),
                values: record.values,
            },
            None => LoadedSettings {
                id: None,
                values: SettingValues::default(),
            },
        })
    }

    /// Create the record on first save, PATCH it afterwards
    pub fn save(&self, settings: &LoadedSettings) -> Result<LoadedSettings> {
        let saved = match settings.id.as_deref() {
            Some(id) => self
                .settings
                .update(id, &serde_json::to_value(&settings.values)?)?,
            None => self.settings.create(&settings.values)?,
        };
        Ok(LoadedSettings {
            id: Some(saved.id),
            values: saved.values,
        })
    }

    /// Flip one switch by key and persist
    pub fn set(&self, key: &str, value: bool) -> Result<LoadedSettings> {
        let mut settings = self.load()?;
        settings.values.set(key, value)?;
        self.save(&settings)
    }

    /// Signed-in devices, most recently active first
    pub fn sessions(&self) -> Result<Vec<UserSession>> {
        let mut sessions = self.sessions.list()?;
        sessions.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(sessions)
    }

    pub fn revoke_session(&self, id: &str) -> Result<()> {
        self.sessions.delete(id)
    }
}
