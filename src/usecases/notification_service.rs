//! Notification list for the signed-in identity.

use crate::domain::{DomainError, Identity, Notification, NotificationKind};
use crate::ports::NotificationRepoPort;
use crate::shared::ids::new_id;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

pub struct NotificationService {
    repo: Arc<dyn NotificationRepoPort>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepoPort>) -> Self {
        Self { repo }
    }

    /// Notices visible to `actor`, newest first.
    pub async fn list(&self, actor: &Identity) -> Result<Vec<Notification>, DomainError> {
        let all = self.repo.list().await?;
        Ok(all.into_iter().filter(|n| n.is_visible_to(actor)).collect())
    }

    pub async fn unread_count(&self, actor: &Identity) -> Result<usize, DomainError> {
        Ok(self.list(actor).await?.iter().filter(|n| !n.read).count())
    }

    /// Marks one notice read. Notices the actor cannot see are reported as not found.
    pub async fn mark_read(&self, actor: &Identity, id: &str) -> Result<(), DomainError> {
        let visible = self.list(actor).await?;
        if !visible.iter().any(|n| n.id == id) {
            return Err(DomainError::not_found("notification", id));
        }
        self.repo.mark_read(&[id.to_string()]).await?;
        Ok(())
    }

    /// Marks every notice visible to `actor` read. Returns how many changed.
    pub async fn mark_all_read(&self, actor: &Identity) -> Result<usize, DomainError> {
        let ids: Vec<String> = self
            .list(actor)
            .await?
            .into_iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        let changed = self.repo.mark_read(&ids).await?;
        debug!(user_id = %actor.id, changed, "notifications marked read");
        Ok(changed)
    }

    /// Adds an unread notice stamped now.
    pub async fn add(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        complaint_id: Option<String>,
        recipient_id: Option<String>,
    ) -> Result<Notification, DomainError> {
        let notification = Notification {
            id: new_id(),
            message: message.into(),
            kind,
            complaint_id,
            recipient_id,
            read: false,
            created_at: Utc::now(),
        };
        self.repo.add(notification.clone()).await?;
        Ok(notification)
    }
}
