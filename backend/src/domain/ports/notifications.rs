//! Driving port for the notification relay.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{Notification, NotificationId};

/// Notification read/maintenance operations exposed to clients.
///
/// Creation is not exposed here: workflows write their own notifications
/// as side effects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifications: Send + Sync {
    /// `user`'s notifications, newest first, capped at `limit`.
    async fn list(&self, user: &TelegramId, limit: i64)
    -> Result<Vec<Notification>, DomainError>;

    /// Count of unread notifications for `user`.
    async fn unread_count(&self, user: &TelegramId) -> Result<u64, DomainError>;

    /// Mark one of `user`'s notifications read.
    async fn mark_read(&self, user: &TelegramId, id: &NotificationId)
    -> Result<(), DomainError>;

    /// Soft-delete one of `user`'s notifications.
    async fn soft_delete(
        &self,
        user: &TelegramId,
        id: &NotificationId,
    ) -> Result<(), DomainError>;
}
