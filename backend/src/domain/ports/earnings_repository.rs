//! Port abstraction for the earnings ledger.
//!
//! The ledger records credits (and refunds) for display aggregates. It is
//! never used to reconcile the balance column; see DESIGN.md.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;

use super::StoreError;

/// Error parsing an unknown earning source tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown earning source: {0}")]
pub struct ParseEarningSourceError(pub String);

/// Where a ledger entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarningSource {
    /// Task completion reward.
    Task,
    /// Referral bonus.
    Referral,
    /// Special-task or level bonus.
    Bonus,
    /// Withdrawal debit.
    Withdrawal,
    /// Refund of a rejected withdrawal.
    Refund,
}

impl EarningSource {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Referral => "referral",
            Self::Bonus => "bonus",
            Self::Withdrawal => "withdrawal",
            Self::Refund => "refund",
        }
    }
}

impl FromStr for EarningSource {
    type Err = ParseEarningSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Self::Task),
            "referral" => Ok(Self::Referral),
            "bonus" => Ok(Self::Bonus),
            "withdrawal" => Ok(Self::Withdrawal),
            "refund" => Ok(Self::Refund),
            other => Err(ParseEarningSourceError(other.to_owned())),
        }
    }
}

impl fmt::Display for EarningSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields required to append a ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEarning {
    /// The credited (or debited) user.
    pub user: TelegramId,
    /// Entry amount; positive for credits.
    pub amount: Taka,
    /// Entry provenance.
    pub source: EarningSource,
    /// Human-readable context (task title, referral code).
    pub description: String,
}

/// Append-and-sum port over the earnings ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EarningsRepository: Send + Sync {
    /// Append a ledger entry.
    async fn insert(&self, earning: &NewEarning) -> Result<(), StoreError>;

    /// Lifetime ledger total for `user`.
    async fn total_for(&self, user: &TelegramId) -> Result<Taka, StoreError>;

    /// Ledger total for `user` since `since`.
    async fn total_since(
        &self,
        user: &TelegramId,
        since: DateTime<Utc>,
    ) -> Result<Taka, StoreError>;
}
