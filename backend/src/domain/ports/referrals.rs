//! Driving port for the referral workflow.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::referral::{Referral, ReferralSummary};

/// Request to record that `referred` joined through `referrer`'s link.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReferralRequest {
    /// The user whose link was used.
    pub referrer: TelegramId,
    /// The user who joined through the link.
    pub referred: TelegramId,
}

/// Referral operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Referrals: Send + Sync {
    /// Record a referral and credit the bonus to both sides. A user may be
    /// referred at most once.
    async fn record_referral(
        &self,
        request: RecordReferralRequest,
    ) -> Result<Referral, DomainError>;

    /// Referral counts and ladder position for `user`.
    async fn summary(&self, user: &TelegramId) -> Result<ReferralSummary, DomainError>;
}
