//! User profiles: identity, financial state, and gamification state.
//!
//! Persisted rows are the source of truth; every mutating workflow writes
//! the store first and hands back the confirmed values.

use chrono::{DateTime, Utc};

use super::identity::TelegramId;
use super::money::Taka;

/// Experience points required per level step.
const XP_PER_LEVEL: i64 = 100;

/// Starting energy for new accounts.
const DEFAULT_ENERGY: i32 = 100;

/// Level reached with `xp` experience points (level 1 at zero).
pub fn level_for_xp(xp: i64) -> i32 {
    let level = xp.div_euclid(XP_PER_LEVEL).saturating_add(1);
    i32::try_from(level).unwrap_or(i32::MAX)
}

/// A user row hydrated from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// External platform id; the key every workflow is scoped by.
    pub telegram_id: TelegramId,
    /// Telegram username, when shared.
    pub username: Option<String>,
    /// First name, when shared.
    pub first_name: Option<String>,
    /// Last name, when shared.
    pub last_name: Option<String>,
    /// Avatar URL, when shared.
    pub photo_url: Option<String>,
    /// Spendable balance.
    pub balance: Taka,
    /// Lifetime credited rewards.
    pub total_earnings: Taka,
    /// Lifetime referral count (recomputed from rows on referral events).
    pub total_referrals: i64,
    /// Gamification level derived from experience.
    pub level: i32,
    /// Accumulated experience points.
    pub experience_points: i64,
    /// Mining power stat.
    pub mining_power: i64,
    /// Current energy.
    pub energy: i32,
    /// Energy cap.
    pub max_energy: i32,
    /// Claim streak counter.
    pub claim_streak: i32,
    /// Last claim instant, if any.
    pub last_claim: Option<DateTime<Utc>>,
    /// This user's shareable referral code.
    pub referral_code: String,
    /// The referrer's id, when this user joined through a link.
    pub referred_by: Option<TelegramId>,
    /// Manual verification flag.
    pub is_verified: bool,
    /// Ban flag; banned users keep their rows.
    pub is_banned: bool,
    /// Reason recorded when banning.
    pub ban_reason: Option<String>,
    /// Row creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
}

/// Identity fields arriving with a Mini-App session.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    /// External platform id.
    pub telegram_id: TelegramId,
    /// Telegram username, when shared.
    pub username: Option<String>,
    /// First name, when shared.
    pub first_name: Option<String>,
    /// Last name, when shared.
    pub last_name: Option<String>,
    /// Avatar URL, when shared.
    pub photo_url: Option<String>,
    /// Referral code or referrer id carried by the start parameter.
    pub referred_by: Option<TelegramId>,
}

/// Fields for creating a user row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    /// External platform id.
    pub telegram_id: TelegramId,
    /// Telegram username, when shared.
    pub username: Option<String>,
    /// First name, when shared.
    pub first_name: Option<String>,
    /// Last name, when shared.
    pub last_name: Option<String>,
    /// Avatar URL, when shared.
    pub photo_url: Option<String>,
    /// Derived shareable referral code.
    pub referral_code: String,
    /// The referrer's id, when known at signup.
    pub referred_by: Option<TelegramId>,
    /// Starting balance.
    pub balance: Taka,
    /// Starting energy.
    pub energy: i32,
    /// Energy cap.
    pub max_energy: i32,
    /// Starting level.
    pub level: i32,
}

impl NewUserRecord {
    /// New-account defaults for a full Mini-App identity.
    pub fn for_identity(identity: &UserIdentity) -> Self {
        Self {
            referral_code: identity.telegram_id.referral_code(),
            telegram_id: identity.telegram_id.clone(),
            username: identity.username.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            photo_url: identity.photo_url.clone(),
            referred_by: identity.referred_by.clone(),
            balance: Taka::ZERO,
            energy: DEFAULT_ENERGY,
            max_energy: DEFAULT_ENERGY,
            level: 1,
        }
    }

    /// Minimal bootstrap row for a user first seen mid-workflow (for
    /// example completing a task before ever loading their profile).
    pub fn bootstrap(telegram_id: &TelegramId) -> Self {
        Self::for_identity(&UserIdentity {
            telegram_id: telegram_id.clone(),
            username: None,
            first_name: None,
            last_name: None,
            photo_url: None,
            referred_by: None,
        })
    }
}

/// Optional profile fields a user may update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    /// New username, when changing.
    pub username: Option<String>,
    /// New first name, when changing.
    pub first_name: Option<String>,
    /// New last name, when changing.
    pub last_name: Option<String>,
    /// New avatar URL, when changing.
    pub photo_url: Option<String>,
}

impl ProfileChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.photo_url.is_none()
    }
}

/// Aggregates over a user's referral, task, and earnings history,
/// recomputed from rows on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Lifetime referral count.
    pub total_referrals: u64,
    /// Referrals recorded today.
    pub today_referrals: u64,
    /// Referrals recorded this week.
    pub week_referrals: u64,
    /// Referrals recorded this month.
    pub month_referrals: u64,
    /// Lifetime completed-task count.
    pub tasks_completed: u64,
    /// Lifetime ledger total.
    pub total_earnings: Taka,
    /// Ledger total for today.
    pub today_earnings: Taka,
    /// Ledger total for this week.
    pub week_earnings: Taka,
    /// Ledger total for this month.
    pub month_earnings: Taka,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(99, 1)]
    #[case(100, 2)]
    #[case(250, 3)]
    #[case(1_000, 11)]
    fn level_steps_every_hundred_xp(#[case] xp: i64, #[case] level: i32) {
        assert_eq!(level_for_xp(xp), level);
    }

    #[rstest]
    fn bootstrap_rows_start_with_defaults() {
        let id = TelegramId::new("987654321").expect("valid id");
        let record = NewUserRecord::bootstrap(&id);

        assert_eq!(record.balance, Taka::ZERO);
        assert_eq!(record.energy, 100);
        assert_eq!(record.level, 1);
        assert_eq!(record.referral_code, "BT654321");
        assert!(record.username.is_none());
    }
}
