//! Withdrawal workflow service.
//!
//! Validation happens before any store call; the request insert and the
//! balance deduction are two sequential writes with no transaction, matching
//! the designed behaviour recorded in DESIGN.md.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{notify_quietly, NewNotification, NotificationKind};
use crate::domain::ports::{
    map_store_error, EarningSource, EarningsRepository, NewEarning, NotificationRepository,
    ResolveWithdrawalRequest, UserRepository, Wallet, WithdrawalReceipt, WithdrawalRepository,
    WithdrawalRequestForm, WithdrawalVerdict, WithdrawalView,
};
use crate::domain::withdrawal::{
    NewWithdrawal, RejectionOutcome, WithdrawalMethod, WithdrawalRequest, WithdrawalStatus,
};

/// History rows returned per request.
const HISTORY_LIMIT: i64 = 50;

/// Domain service implementing the wallet driving port.
pub struct WalletService<W, U, E, N> {
    withdrawals: Arc<W>,
    users: Arc<U>,
    earnings: Arc<E>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<W, U, E, N> WalletService<W, U, E, N> {
    /// Create a new service over the given repositories.
    pub fn new(
        withdrawals: Arc<W>,
        users: Arc<U>,
        earnings: Arc<E>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            withdrawals,
            users,
            earnings,
            notifications,
            clock,
        }
    }
}

/// Validated payout details extracted from the form.
struct PayoutDetails {
    account_number: String,
    account_name: String,
    bank_name: Option<String>,
    crypto_symbol: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate method-specific required fields, defaulting the account name
/// for non-bank channels the way the original form did.
fn payout_details(form: &WithdrawalRequestForm) -> Result<PayoutDetails, DomainError> {
    let account_number = non_blank(form.account_number.as_ref());
    let account_name = non_blank(form.account_name.as_ref());
    let bank_name = non_blank(form.bank_name.as_ref());
    let crypto_symbol = non_blank(form.crypto_symbol.as_ref());

    match form.method {
        WithdrawalMethod::Bank => {
            let (Some(bank), Some(name), Some(number)) = (bank_name, account_name, account_number)
            else {
                return Err(DomainError::invalid_request(
                    "Please fill in all bank details including account holder name",
                ));
            };
            Ok(PayoutDetails {
                account_number: number.to_owned(),
                account_name: name.to_owned(),
                bank_name: Some(bank.to_owned()),
                crypto_symbol: None,
            })
        }
        WithdrawalMethod::Crypto => {
            let (Some(symbol), Some(address)) = (crypto_symbol, account_number) else {
                return Err(DomainError::invalid_request(
                    "Please select cryptocurrency and enter wallet address",
                ));
            };
            let name = account_name
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{symbol} Wallet"));
            Ok(PayoutDetails {
                account_number: address.to_owned(),
                account_name: name,
                bank_name: None,
                crypto_symbol: Some(symbol.to_owned()),
            })
        }
        method => {
            let Some(number) = account_number else {
                return Err(DomainError::invalid_request("Please enter mobile number"));
            };
            let name = account_name
                .map(str::to_owned)
                .unwrap_or_else(|| method.display_name().to_owned());
            Ok(PayoutDetails {
                account_number: number.to_owned(),
                account_name: name,
                bank_name: None,
                crypto_symbol: None,
            })
        }
    }
}

impl<W, U, E, N> WalletService<W, U, E, N>
where
    W: WithdrawalRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn refund(&self, withdrawal: &WithdrawalRequest) -> Result<(), DomainError> {
        let profile = self
            .users
            .find(&withdrawal.user)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::internal("withdrawal owner has no user row"))?;
        let new_balance = profile
            .balance
            .checked_add(withdrawal.amount)
            .ok_or_else(|| DomainError::internal("balance overflow"))?;
        self.users
            .set_balances(&withdrawal.user, new_balance, profile.total_earnings)
            .await
            .map_err(|error| map_store_error("user store", error))?;

        if let Err(error) = self
            .earnings
            .insert(&NewEarning {
                user: withdrawal.user.clone(),
                amount: withdrawal.amount,
                source: EarningSource::Refund,
                description: format!("withdrawal {} refunded", withdrawal.id),
            })
            .await
        {
            warn!(user = %withdrawal.user, %error, "failed to append refund ledger entry");
        }
        Ok(())
    }
}

#[async_trait]
impl<W, U, E, N> Wallet for WalletService<W, U, E, N>
where
    W: WithdrawalRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn request_withdrawal(
        &self,
        form: WithdrawalRequestForm,
    ) -> Result<WithdrawalReceipt, DomainError> {
        let minimum = form.method.min_amount();
        if form.amount < minimum {
            return Err(DomainError::invalid_request(format!(
                "Minimum withdrawal amount is {minimum}"
            ))
            .with_details(json!({ "minAmount": minimum.amount() })));
        }

        let details = payout_details(&form)?;

        let profile = self
            .users
            .find(&form.user)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        if form.amount > profile.balance {
            return Err(DomainError::invalid_request(
                "Insufficient balance for withdrawal",
            ));
        }

        // First write: the pending request row.
        let request = self
            .withdrawals
            .insert(&NewWithdrawal {
                user: form.user.clone(),
                amount: form.amount,
                method: form.method,
                account_number: details.account_number,
                account_name: details.account_name,
                bank_name: details.bank_name,
                crypto_symbol: details.crypto_symbol,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(|error| map_store_error("withdrawal store", error))?;

        // Second write: deduct the amount, read-modify-write. A failure
        // here leaves the request queued with the balance untouched.
        let new_balance = profile
            .balance
            .checked_sub(form.amount)
            .ok_or_else(|| DomainError::internal("balance underflow"))?;
        if let Err(error) = self
            .users
            .set_balances(&form.user, new_balance, profile.total_earnings)
            .await
        {
            warn!(
                user = %form.user,
                withdrawal = %request.id,
                %error,
                "withdrawal queued but amount was not deducted"
            );
            return Err(map_store_error("user store", error));
        }

        info!(
            user = %form.user,
            withdrawal = %request.id,
            amount = form.amount.amount(),
            method = %form.method,
            "withdrawal requested"
        );
        notify_quietly(
            self.notifications.as_ref(),
            NewNotification::plain(
                form.user.clone(),
                NotificationKind::Info,
                "Withdrawal Request Submitted",
                format!(
                    "Your withdrawal request of {} has been submitted and is under review.",
                    form.amount
                ),
            ),
        )
        .await;

        Ok(WithdrawalReceipt {
            request,
            new_balance,
        })
    }

    async fn history(&self, user: &TelegramId) -> Result<Vec<WithdrawalView>, DomainError> {
        let rows = self
            .withdrawals
            .list_for_user(user, HISTORY_LIMIT)
            .await
            .map_err(|error| map_store_error("withdrawal store", error))?;

        Ok(rows
            .into_iter()
            .map(|request| {
                let rejection = (request.status == WithdrawalStatus::Rejected)
                    .then(|| RejectionOutcome::classify(request.admin_notes.as_deref()));
                WithdrawalView { request, rejection }
            })
            .collect())
    }

    async fn resolve_withdrawal(
        &self,
        request: ResolveWithdrawalRequest,
    ) -> Result<WithdrawalRequest, DomainError> {
        let withdrawal = self
            .withdrawals
            .find(&request.withdrawal_id)
            .await
            .map_err(|error| map_store_error("withdrawal store", error))?
            .ok_or_else(|| DomainError::not_found("withdrawal not found"))?;
        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(DomainError::conflict("withdrawal already resolved"));
        }

        let status = match request.verdict {
            WithdrawalVerdict::Approve => WithdrawalStatus::Approved,
            WithdrawalVerdict::Reject => WithdrawalStatus::Rejected,
        };
        let updated = self
            .withdrawals
            .mark_resolved(
                &request.withdrawal_id,
                status,
                request.notes.clone(),
                self.clock.utc(),
            )
            .await
            .map_err(|error| map_store_error("withdrawal store", error))?
            .ok_or_else(|| DomainError::internal("withdrawal vanished during resolution"))?;

        match request.verdict {
            WithdrawalVerdict::Approve => {
                notify_quietly(
                    self.notifications.as_ref(),
                    NewNotification::plain(
                        updated.user.clone(),
                        NotificationKind::Success,
                        "Withdrawal Approved",
                        format!("Your withdrawal of {} has been paid out.", updated.amount),
                    ),
                )
                .await;
            }
            WithdrawalVerdict::Reject => {
                match RejectionOutcome::classify(updated.admin_notes.as_deref()) {
                    RejectionOutcome::Refunded => {
                        self.refund(&updated).await?;
                        notify_quietly(
                            self.notifications.as_ref(),
                            NewNotification::plain(
                                updated.user.clone(),
                                NotificationKind::Warning,
                                "Withdrawal Rejected",
                                format!(
                                    "Your withdrawal of {} was rejected. The amount was refunded to your balance.",
                                    updated.amount
                                ),
                            ),
                        )
                        .await;
                    }
                    RejectionOutcome::Forfeited => {
                        notify_quietly(
                            self.notifications.as_ref(),
                            NewNotification::plain(
                                updated.user.clone(),
                                NotificationKind::Error,
                                "Withdrawal Rejected",
                                "Your withdrawal was rejected. No refund was given.",
                            ),
                        )
                        .await;
                    }
                }
            }
        }

        Ok(updated)
    }
}

#[cfg(test)]
#[path = "wallet_service_tests.rs"]
mod wallet_service_tests;
