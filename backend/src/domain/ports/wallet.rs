//! Driving port for withdrawals.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::withdrawal::{
    RejectionOutcome, WithdrawalId, WithdrawalMethod, WithdrawalRequest,
};

/// A withdrawal request as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRequestForm {
    /// The requesting user.
    pub user: TelegramId,
    /// Amount to withdraw.
    pub amount: Taka,
    /// Payout channel.
    pub method: WithdrawalMethod,
    /// Mobile number, bank account number, or wallet address.
    pub account_number: Option<String>,
    /// Account holder name; defaulted from the method when omitted for
    /// non-bank channels.
    pub account_name: Option<String>,
    /// Bank name, required for bank transfers.
    pub bank_name: Option<String>,
    /// Currency symbol, required for crypto payouts.
    pub crypto_symbol: Option<String>,
}

/// Result of a successful withdrawal request.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalReceipt {
    /// The recorded pending request.
    pub request: WithdrawalRequest,
    /// The balance confirmed by the store after deduction.
    pub new_balance: Taka,
}

/// A history row annotated with its refund classification.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalView {
    /// The stored request.
    pub request: WithdrawalRequest,
    /// Refund classification, present only for rejected requests.
    pub rejection: Option<RejectionOutcome>,
}

/// Admin verdict on a pending withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalVerdict {
    /// Pay out and mark approved.
    Approve,
    /// Reject; the notes decide whether the amount is refunded.
    Reject,
}

/// Request to resolve a pending withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveWithdrawalRequest {
    /// The withdrawal to resolve.
    pub withdrawal_id: WithdrawalId,
    /// The verdict.
    pub verdict: WithdrawalVerdict,
    /// Free-text notes; on rejection these decide refund vs. forfeit.
    pub notes: Option<String>,
}

/// Withdrawal operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Validate and queue a withdrawal, deducting the amount.
    async fn request_withdrawal(
        &self,
        form: WithdrawalRequestForm,
    ) -> Result<WithdrawalReceipt, DomainError>;

    /// `user`'s withdrawal history, newest first, with refund
    /// classification for rejected rows.
    async fn history(&self, user: &TelegramId) -> Result<Vec<WithdrawalView>, DomainError>;

    /// Resolve a pending withdrawal (admin collaborator transition).
    async fn resolve_withdrawal(
        &self,
        request: ResolveWithdrawalRequest,
    ) -> Result<WithdrawalRequest, DomainError>;
}
