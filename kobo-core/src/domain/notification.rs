//! Notification domain model

use serde::{Deserialize, Serialize};

use super::de;
use super::resource::{Record, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Record for Notification {
    const RESOURCE: Resource = Resource::Notification;

    fn id(&self) -> &str {
        &self.id
    }
}
