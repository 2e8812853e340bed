//! Port abstraction for notification rows.

use async_trait::async_trait;

use crate::domain::identity::TelegramId;
use crate::domain::notification::{NewNotification, Notification, NotificationId};

use super::StoreError;

/// Port over the notification table.
///
/// Deletion is soft: rows are flagged, never removed, so the relay can keep
/// an audit trail of what the user was told.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a notification.
    async fn insert(&self, notification: &NewNotification) -> Result<Notification, StoreError>;

    /// Undeleted notifications for `user`, newest first, capped at
    /// `limit` rows.
    async fn list_for_user(
        &self,
        user: &TelegramId,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Count of unread, undeleted notifications for `user`.
    async fn unread_count(&self, user: &TelegramId) -> Result<u64, StoreError>;

    /// Mark one of `user`'s notifications read. Returns false when no such
    /// row exists.
    async fn mark_read(&self, user: &TelegramId, id: &NotificationId) -> Result<bool, StoreError>;

    /// Soft-delete one of `user`'s notifications. Returns false when no
    /// such row exists.
    async fn soft_delete(
        &self,
        user: &TelegramId,
        id: &NotificationId,
    ) -> Result<bool, StoreError>;
}
