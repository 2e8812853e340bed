//! Monetary amounts in Bangladeshi taka.
//!
//! The app deals exclusively in whole-taka rewards and withdrawals, so
//! amounts are integers end to end. Arithmetic is checked: balance mutation
//! paths must handle overflow explicitly rather than wrap.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A whole-taka amount. May be negative in ledger contexts (debits).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct Taka(i64);

impl Taka {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Construct an amount from a whole-taka value.
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The raw whole-taka value.
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// Checked addition; `None` on overflow.
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Checked subtraction; `None` on overflow.
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(diff) => Some(Self(diff)),
            None => None,
        }
    }

    /// True when the amount is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Taka {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{09f3}{}", self.0)
    }
}

impl From<i64> for Taka {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}
