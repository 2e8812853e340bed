//! PostgreSQL-backed `CompletionRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::completion::{NewCompletion, TaskCompletion};
use crate::domain::identity::TelegramId;
use crate::domain::ports::{CompletionRepository, StoreError};
use crate::domain::task::TaskId;

use super::diesel_helpers::{count_to_u64, map_diesel_error, map_pool_error};
use super::models::{CompletionRow, NewCompletionRow};
use super::pool::DbPool;
use super::schema::task_completions;

/// Diesel adapter for the completion repository port.
#[derive(Clone)]
pub struct DieselCompletionRepository {
    pool: DbPool,
}

impl DieselCompletionRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompletionRepository for DieselCompletionRepository {
    async fn latest_for(
        &self,
        user: &TelegramId,
        task: &TaskId,
    ) -> Result<Option<TaskCompletion>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompletionRow> = task_completions::table
            .filter(task_completions::user_id.eq(user.as_str()))
            .filter(task_completions::task_id.eq(task.as_uuid()))
            .order(task_completions::completed_at.desc())
            .select(CompletionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(CompletionRow::into_domain).transpose()
    }

    async fn insert(&self, completion: &NewCompletion) -> Result<TaskCompletion, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CompletionRow = diesel::insert_into(task_completions::table)
            .values(&NewCompletionRow {
                user_id: completion.user.as_str(),
                task_id: *completion.task_id.as_uuid(),
                task_type: completion.task_type.as_str(),
                task_title: completion.task_title.as_str(),
                reward_amount: completion.reward.amount(),
                completed_at: completion.completed_at,
            })
            .returning(CompletionRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn history_since(
        &self,
        user: &TelegramId,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TaskCompletion>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CompletionRow> = task_completions::table
            .filter(task_completions::user_id.eq(user.as_str()))
            .filter(task_completions::completed_at.ge(since))
            .order(task_completions::completed_at.desc())
            .limit(limit)
            .select(CompletionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(CompletionRow::into_domain).collect()
    }

    async fn count_for(&self, user: &TelegramId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = task_completions::table
            .filter(task_completions::user_id.eq(user.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u64(count))
    }
}
