//! BaaS resource collections

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A CRUD collection exposed by the BaaS API group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Transaction,
    Card,
    Bill,
    Notification,
    UserSetting,
    UserSession,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Transaction,
        Resource::Card,
        Resource::Bill,
        Resource::Notification,
        Resource::UserSetting,
        Resource::UserSession,
    ];

    /// Path segment under the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Transaction => "transaction",
            Resource::Card => "card",
            Resource::Bill => "bill",
            Resource::Notification => "notification",
            Resource::UserSetting => "user_setting",
            Resource::UserSession => "user_session",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A typed record stored in one of the BaaS collections
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const RESOURCE: Resource;

    /// Record id as assigned by the BaaS
    fn id(&self) -> &str;
}
