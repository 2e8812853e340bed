//! Notification relay service.
//!
//! Thin pass-through over the repository: workflows create notifications as
//! side effects; this service only exposes reading and maintenance to
//! clients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::ports::{map_store_error, NotificationRepository, Notifications};

/// Domain service implementing the notifications driving port.
pub struct NotificationsService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationsService<N> {
    /// Create a new service over the given repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> Notifications for NotificationsService<N>
where
    N: NotificationRepository,
{
    async fn list(
        &self,
        user: &TelegramId,
        limit: i64,
    ) -> Result<Vec<Notification>, DomainError> {
        self.notifications
            .list_for_user(user, limit)
            .await
            .map_err(|error| map_store_error("notification store", error))
    }

    async fn unread_count(&self, user: &TelegramId) -> Result<u64, DomainError> {
        self.notifications
            .unread_count(user)
            .await
            .map_err(|error| map_store_error("notification store", error))
    }

    async fn mark_read(
        &self,
        user: &TelegramId,
        id: &NotificationId,
    ) -> Result<(), DomainError> {
        let updated = self
            .notifications
            .mark_read(user, id)
            .await
            .map_err(|error| map_store_error("notification store", error))?;
        if updated {
            Ok(())
        } else {
            Err(DomainError::not_found("notification not found"))
        }
    }

    async fn soft_delete(
        &self,
        user: &TelegramId,
        id: &NotificationId,
    ) -> Result<(), DomainError> {
        let deleted = self
            .notifications
            .soft_delete(user, id)
            .await
            .map_err(|error| map_store_error("notification store", error))?;
        if deleted {
            Ok(())
        } else {
            Err(DomainError::not_found("notification not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockNotificationRepository;

    fn user() -> TelegramId {
        TelegramId::new("123456789").expect("valid id")
    }

    #[tokio::test]
    async fn mark_read_maps_missing_rows_to_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().return_once(|_, _| Ok(false));

        let service = NotificationsService::new(Arc::new(repo));
        let error = service
            .mark_read(&user(), &NotificationId::random())
            .await
            .expect_err("missing row");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn mark_read_succeeds_for_existing_rows() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().return_once(|_, _| Ok(true));

        let service = NotificationsService::new(Arc::new(repo));
        service
            .mark_read(&user(), &NotificationId::random())
            .await
            .expect("marked read");
    }

    #[tokio::test]
    async fn unread_count_passes_through() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_unread_count().return_once(|_| Ok(3));

        let service = NotificationsService::new(Arc::new(repo));
        assert_eq!(service.unread_count(&user()).await.expect("count"), 3);
    }
}
