//! Port abstraction for referral facts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::identity::TelegramId;
use crate::domain::referral::{NewReferral, Referral};

use super::StoreError;

/// Port over the referral table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Whether `referred` has already been referred by anyone.
    async fn exists_for_referred(&self, referred: &TelegramId) -> Result<bool, StoreError>;

    /// Record a referral.
    ///
    /// Returns [`StoreError::Duplicate`] when `referred` already has a
    /// referral row (unique `referred_id`).
    async fn insert(&self, referral: &NewReferral) -> Result<Referral, StoreError>;

    /// Lifetime referral count for `referrer`.
    async fn count_for_referrer(&self, referrer: &TelegramId) -> Result<u64, StoreError>;

    /// Referral count for `referrer` since `since`.
    async fn count_for_referrer_since(
        &self,
        referrer: &TelegramId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
