//! Notification service

use serde_json::json;

use super::resource::ResourceService;
use super::session::Session;
use crate::domain::result::Result;
use crate::domain::Notification;

pub struct NotificationService {
    notifications: ResourceService<Notification>,
}

impl NotificationService {
    pub fn new(session: Session) -> Self {
        Self {
            notifications: ResourceService::new(session),
        }
    }

    /// Newest first
    pub fn list(&self) -> Result<Vec<Notification>> {
        let mut items = self.notifications.list()?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    pub fn unread_count(&self) -> Result<usize> {
        Ok(self.notifications.list()?.iter().filter(|n| !n.read).count())
    }

    pub fn mark_read(&self, id: &str) -> Result<Notification> {
        self.notifications.update(id, &json!({ "read": true }))
    }

    /// Mark every unread notification; returns how many changed
    pub fn mark_all_read(&self) -> Result<usize> {
        let unread: Vec<Notification> = self
            .notifications
            .list()?
            .into_iter()
            .filter(|n| !n.read)
            .collect();
        for notification in &unread {
            self.mark_read(&notification.id)?;
        }
        Ok(unread.len())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.notifications.delete(id)
    }
}
