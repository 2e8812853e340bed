//! Port abstraction for task completion facts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::completion::{NewCompletion, TaskCompletion};
use crate::domain::identity::TelegramId;
use crate::domain::task::TaskId;

use super::StoreError;

/// Append-and-scan port over the completion table.
///
/// Cooldowns and streaks are derived by scanning recent rows rather than
/// reading stored counters, so the query surface is deliberately small.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// The most recent completion of `task` by `user`, if any.
    async fn latest_for(
        &self,
        user: &TelegramId,
        task: &TaskId,
    ) -> Result<Option<TaskCompletion>, StoreError>;

    /// Record a completion.
    async fn insert(&self, completion: &NewCompletion) -> Result<TaskCompletion, StoreError>;

    /// Completions by `user` since `since`, newest first, capped at
    /// `limit` rows.
    async fn history_since(
        &self,
        user: &TelegramId,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TaskCompletion>, StoreError>;

    /// Lifetime completion count for `user`.
    async fn count_for(&self, user: &TelegramId) -> Result<u64, StoreError>;
}
