//! Referral facts and the referral level ladder.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::TelegramId;
use super::money::Taka;

/// A fact linking a referrer to a referred user. One row per referred user.
#[derive(Debug, Clone, PartialEq)]
pub struct Referral {
    /// Row identifier.
    pub id: Uuid,
    /// The user whose link was used.
    pub referrer: TelegramId,
    /// The user who joined through the link.
    pub referred: TelegramId,
    /// Bonus credited to each side when the referral was recorded.
    pub reward: Taka,
    /// When the referral was recorded.
    pub created_at: DateTime<Utc>,
}

/// Fields required to record a new referral.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReferral {
    /// The user whose link was used.
    pub referrer: TelegramId,
    /// The user who joined through the link.
    pub referred: TelegramId,
    /// Bonus credited to each side.
    pub reward: Taka,
}

/// One rung of the referral level ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralLevel {
    /// Ladder rung, 1-based.
    pub level: u8,
    /// Referral count required to reach this rung.
    pub required: u64,
    /// One-off bonus paid on reaching the rung.
    pub bonus: Taka,
    /// Experience granted on reaching the rung.
    pub xp: i64,
}

/// The referral ladder, lowest rung first.
pub const REFERRAL_LEVELS: [ReferralLevel; 5] = [
    ReferralLevel {
        level: 1,
        required: 100,
        bonus: Taka::new(200),
        xp: 100,
    },
    ReferralLevel {
        level: 2,
        required: 1_000,
        bonus: Taka::new(500),
        xp: 200,
    },
    ReferralLevel {
        level: 3,
        required: 5_000,
        bonus: Taka::new(1_500),
        xp: 500,
    },
    ReferralLevel {
        level: 4,
        required: 10_000,
        bonus: Taka::new(3_000),
        xp: 1_000,
    },
    ReferralLevel {
        level: 5,
        required: 100_000,
        bonus: Taka::new(10_000),
        xp: 5_000,
    },
];

/// The highest rung reached with `total` referrals, if any.
pub fn reached_level(total: u64) -> Option<ReferralLevel> {
    REFERRAL_LEVELS
        .iter()
        .rev()
        .find(|level| total >= level.required)
        .copied()
}

/// The next rung above `total` referrals, if the ladder is not exhausted.
pub fn next_level(total: u64) -> Option<ReferralLevel> {
    REFERRAL_LEVELS
        .iter()
        .find(|level| total < level.required)
        .copied()
}

/// Referral counts and ladder position for one user, derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSummary {
    /// Lifetime referral count.
    pub total: u64,
    /// Referrals recorded today.
    pub today: u64,
    /// Referrals recorded this week.
    pub this_week: u64,
    /// Referrals recorded this month.
    pub this_month: u64,
    /// Highest ladder rung reached, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_level: Option<ReferralLevel>,
    /// Next ladder rung, if any remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level: Option<ReferralLevel>,
}
