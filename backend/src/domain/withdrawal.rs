//! Withdrawal requests and their resolution semantics.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::TelegramId;
use super::money::Taka;

/// Identifier of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct WithdrawalId(Uuid);

impl WithdrawalId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a random id. Primarily useful for tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error parsing an unknown withdrawal method tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown withdrawal method: {0}")]
pub struct ParseWithdrawalMethodError(pub String);

/// Supported payout channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalMethod {
    /// bKash mobile money.
    Bkash,
    /// Nagad mobile money.
    Nagad,
    /// Rocket mobile money.
    Rocket,
    /// Upay mobile money.
    Upay,
    /// Bank transfer.
    Bank,
    /// Cryptocurrency wallet.
    Crypto,
}

impl WithdrawalMethod {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bkash => "bkash",
            Self::Nagad => "nagad",
            Self::Rocket => "rocket",
            Self::Upay => "upay",
            Self::Bank => "bank",
            Self::Crypto => "crypto",
        }
    }

    /// Human-readable name, used when defaulting a missing account name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bkash => "Bkash",
            Self::Nagad => "Nagad",
            Self::Rocket => "Rocket",
            Self::Upay => "Upay",
            Self::Bank => "Bank",
            Self::Crypto => "Crypto",
        }
    }

    /// Minimum amount accepted for this method.
    pub const fn min_amount(self) -> Taka {
        Taka::new(100)
    }

    /// Mobile-money methods need a mobile number rather than bank or
    /// wallet details.
    pub const fn is_mobile_money(self) -> bool {
        matches!(self, Self::Bkash | Self::Nagad | Self::Rocket | Self::Upay)
    }
}

impl FromStr for WithdrawalMethod {
    type Err = ParseWithdrawalMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bkash" => Ok(Self::Bkash),
            "nagad" => Ok(Self::Nagad),
            "rocket" => Ok(Self::Rocket),
            "upay" => Ok(Self::Upay),
            "bank" => Ok(Self::Bank),
            "crypto" => Ok(Self::Crypto),
            other => Err(ParseWithdrawalMethodError(other.to_owned())),
        }
    }
}

impl fmt::Display for WithdrawalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an unknown withdrawal status tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown withdrawal status: {0}")]
pub struct ParseWithdrawalStatusError(pub String);

/// Lifecycle state of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Awaiting admin review. The amount was already deducted.
    Pending,
    /// Approved and paid out.
    Approved,
    /// Rejected; whether the amount was refunded depends on the
    /// [`RejectionOutcome`] classification.
    Rejected,
}

impl WithdrawalStatus {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for WithdrawalStatus {
    type Err = ParseWithdrawalStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseWithdrawalStatusError(other.to_owned())),
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a rejected withdrawal refunds the deducted amount.
///
/// The distinction is keyed on free-text admin notes: notes mentioning
/// "fraud" or "invalid" forfeit the amount, anything else refunds it. This
/// fragility is inherited from the admin console contract; keep the
/// classification in this one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionOutcome {
    /// The deducted amount is returned to the balance.
    Refunded,
    /// No refund is given.
    Forfeited,
}

impl RejectionOutcome {
    /// Classify a rejection from the admin's free-text notes.
    pub fn classify(admin_notes: Option<&str>) -> Self {
        let forfeited = admin_notes
            .map(|notes| {
                let notes = notes.to_lowercase();
                notes.contains("fraud") || notes.contains("invalid")
            })
            .unwrap_or(false);
        if forfeited {
            Self::Forfeited
        } else {
            Self::Refunded
        }
    }
}

/// A withdrawal request row.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRequest {
    /// Row identifier.
    pub id: WithdrawalId,
    /// The requesting user.
    pub user: TelegramId,
    /// Amount requested (already deducted from the balance).
    pub amount: Taka,
    /// Payout channel.
    pub method: WithdrawalMethod,
    /// Mobile number, bank account number, or wallet address.
    pub account_number: String,
    /// Account holder name (defaulted from the method when omitted).
    pub account_name: String,
    /// Bank name, for bank transfers.
    pub bank_name: Option<String>,
    /// Currency symbol, for crypto payouts.
    pub crypto_symbol: Option<String>,
    /// Current lifecycle state.
    pub status: WithdrawalStatus,
    /// Free-text notes recorded by the admin collaborator.
    pub admin_notes: Option<String>,
    /// When the request was resolved, if it was.
    pub processed_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

/// Fields required to record a new withdrawal request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWithdrawal {
    /// The requesting user.
    pub user: TelegramId,
    /// Amount requested.
    pub amount: Taka,
    /// Payout channel.
    pub method: WithdrawalMethod,
    /// Mobile number, bank account number, or wallet address.
    pub account_number: String,
    /// Account holder name.
    pub account_name: String,
    /// Bank name, for bank transfers.
    pub bank_name: Option<String>,
    /// Currency symbol, for crypto payouts.
    pub crypto_symbol: Option<String>,
    /// Request instant, taken from the service clock.
    pub created_at: DateTime<Utc>,
}
