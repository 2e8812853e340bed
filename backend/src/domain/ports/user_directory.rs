//! Driving port for user session hydration and profile maintenance.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::user::{ProfileChanges, UserIdentity, UserProfile, UserStats};

/// User directory operations.
///
/// The store is the sole source of truth: every operation returns the row
/// as confirmed by the store, never an optimistically patched copy of
/// anything the store has not acknowledged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Hydrate the session on first load: fetch the user, creating the row
    /// with new-account defaults when absent.
    async fn load_or_create(&self, identity: UserIdentity) -> Result<UserProfile, DomainError>;

    /// Fetch an existing profile.
    async fn profile(&self, user: &TelegramId) -> Result<UserProfile, DomainError>;

    /// Apply profile field changes.
    async fn update_profile(
        &self,
        user: &TelegramId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, DomainError>;

    /// Aggregate referral, task, and earnings stats, recomputed from rows.
    async fn stats(&self, user: &TelegramId) -> Result<UserStats, DomainError>;

    /// Add experience points, recomputing the level.
    async fn grant_experience(
        &self,
        user: &TelegramId,
        xp: i64,
    ) -> Result<UserProfile, DomainError>;
}
