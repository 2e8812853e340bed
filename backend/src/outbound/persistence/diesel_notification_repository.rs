//! PostgreSQL-backed `NotificationRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::notification::{NewNotification, Notification, NotificationId};
use crate::domain::ports::{NotificationRepository, StoreError};

use super::diesel_helpers::{count_to_u64, map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel adapter for the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: NotificationRow = diesel::insert_into(notifications::table)
            .values(&NewNotificationRow {
                user_id: notification.user.as_str(),
                kind: notification.kind.as_str(),
                title: notification.title.as_str(),
                message: notification.message.as_str(),
                action_url: notification.action_url.as_deref(),
                metadata: &notification.metadata,
            })
            .returning(NotificationRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn list_for_user(
        &self,
        user: &TelegramId,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user.as_str()))
            .filter(notifications::is_deleted.eq(false))
            .order(notifications::created_at.desc())
            .limit(limit)
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(NotificationRow::into_domain).collect()
    }

    async fn unread_count(&self, user: &TelegramId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user.as_str()))
            .filter(notifications::is_read.eq(false))
            .filter(notifications::is_deleted.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u64(count))
    }

    async fn mark_read(&self, user: &TelegramId, id: &NotificationId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(notifications::table)
            .filter(notifications::id.eq(id.as_uuid()))
            .filter(notifications::user_id.eq(user.as_str()))
            .set(notifications::is_read.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn soft_delete(
        &self,
        user: &TelegramId,
        id: &NotificationId,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(notifications::table)
            .filter(notifications::id.eq(id.as_uuid()))
            .filter(notifications::user_id.eq(user.as_str()))
            .set(notifications::is_deleted.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
