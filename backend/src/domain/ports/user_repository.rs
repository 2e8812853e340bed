//! Port abstraction for user row persistence.

use async_trait::async_trait;

use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::user::{NewUserRecord, ProfileChanges, UserProfile};

use super::StoreError;

/// Port for user row storage and mutation.
///
/// Balance updates are plain read-modify-write: the service reads the
/// profile, computes the new totals, and writes them back. There is no
/// atomic increment and no optimistic-concurrency token; this mirrors the
/// designed behaviour of the workflow (see DESIGN.md).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by Telegram id.
    async fn find(&self, id: &TelegramId) -> Result<Option<UserProfile>, StoreError>;

    /// Insert a new user row.
    ///
    /// Returns [`StoreError::Duplicate`] when a row for the Telegram id
    /// already exists (concurrent first-load race).
    async fn insert(&self, record: &NewUserRecord) -> Result<UserProfile, StoreError>;

    /// Apply profile field changes and return the updated row.
    async fn update_profile(
        &self,
        id: &TelegramId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, StoreError>;

    /// Overwrite the balance and lifetime earnings columns.
    async fn set_balances(
        &self,
        id: &TelegramId,
        balance: Taka,
        total_earnings: Taka,
    ) -> Result<(), StoreError>;

    /// Overwrite the experience and level columns.
    async fn set_experience(&self, id: &TelegramId, xp: i64, level: i32)
    -> Result<(), StoreError>;

    /// Overwrite the lifetime referral counter.
    async fn set_total_referrals(&self, id: &TelegramId, total: i64) -> Result<(), StoreError>;
}
