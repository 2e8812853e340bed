//! Port abstraction for withdrawal request persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::identity::TelegramId;
use crate::domain::withdrawal::{
    NewWithdrawal, WithdrawalId, WithdrawalRequest, WithdrawalStatus,
};

use super::StoreError;

/// Port over the withdrawal request table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WithdrawalRepository: Send + Sync {
    /// Record a pending withdrawal request.
    async fn insert(&self, withdrawal: &NewWithdrawal) -> Result<WithdrawalRequest, StoreError>;

    /// Requests by `user`, newest first, capped at `limit` rows.
    async fn list_for_user(
        &self,
        user: &TelegramId,
        limit: i64,
    ) -> Result<Vec<WithdrawalRequest>, StoreError>;

    /// Fetch a request by id.
    async fn find(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, StoreError>;

    /// Transition a request's lifecycle state and return the updated row.
    async fn mark_resolved(
        &self,
        id: &WithdrawalId,
        status: WithdrawalStatus,
        admin_notes: Option<String>,
        processed_at: DateTime<Utc>,
    ) -> Result<Option<WithdrawalRequest>, StoreError>;
}
