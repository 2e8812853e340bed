//! Referral workflow service.
//!
//! Recording a referral credits the configured bonus to both sides and
//! refreshes the referrer's stored counter from the row count.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::notification::{notify_quietly, NewNotification, NotificationKind};
use crate::domain::ports::{
    map_store_error, EarningSource, EarningsRepository, NewEarning, NotificationRepository,
    RecordReferralRequest, ReferralRepository, Referrals, StoreError, UserRepository,
};
use crate::domain::referral::{
    next_level, reached_level, NewReferral, Referral, ReferralSummary,
};
use crate::domain::schedule::{start_of_day, start_of_month, start_of_week};

/// Domain service implementing the referrals driving port.
pub struct ReferralsService<R, U, E, N> {
    referrals: Arc<R>,
    users: Arc<U>,
    earnings: Arc<E>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
    bonus: Taka,
}

impl<R, U, E, N> ReferralsService<R, U, E, N> {
    /// Create a new service crediting `bonus` to each side of a referral.
    pub fn new(
        referrals: Arc<R>,
        users: Arc<U>,
        earnings: Arc<E>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
        bonus: Taka,
    ) -> Self {
        Self {
            referrals,
            users,
            earnings,
            notifications,
            clock,
            bonus,
        }
    }
}

impl<R, U, E, N> ReferralsService<R, U, E, N>
where
    R: ReferralRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn credit_bonus(&self, user: &TelegramId, description: &str) -> Result<(), DomainError> {
        let profile = self
            .users
            .find(user)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::internal("referral side has no user row"))?;
        let new_balance = profile
            .balance
            .checked_add(self.bonus)
            .ok_or_else(|| DomainError::internal("balance overflow"))?;
        let new_total = profile
            .total_earnings
            .checked_add(self.bonus)
            .ok_or_else(|| DomainError::internal("total earnings overflow"))?;
        self.users
            .set_balances(user, new_balance, new_total)
            .await
            .map_err(|error| map_store_error("user store", error))?;

        if let Err(error) = self
            .earnings
            .insert(&NewEarning {
                user: user.clone(),
                amount: self.bonus,
                source: EarningSource::Referral,
                description: description.to_owned(),
            })
            .await
        {
            warn!(%user, %error, "failed to append earnings ledger entry");
        }
        Ok(())
    }
}

#[async_trait]
impl<R, U, E, N> Referrals for ReferralsService<R, U, E, N>
where
    R: ReferralRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn record_referral(
        &self,
        request: RecordReferralRequest,
    ) -> Result<Referral, DomainError> {
        if request.referrer == request.referred {
            return Err(DomainError::invalid_request("cannot refer yourself"));
        }

        // The referred user must already have an account.
        self.users
            .find(&request.referred)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::not_found("referred user not found"))?;

        if self
            .referrals
            .exists_for_referred(&request.referred)
            .await
            .map_err(|error| map_store_error("referral store", error))?
        {
            return Err(DomainError::conflict("user already referred"));
        }

        let referral = match self
            .referrals
            .insert(&NewReferral {
                referrer: request.referrer.clone(),
                referred: request.referred.clone(),
                reward: self.bonus,
            })
            .await
        {
            Ok(referral) => referral,
            Err(StoreError::Duplicate { .. }) => {
                return Err(DomainError::conflict("user already referred"));
            }
            Err(error) => return Err(map_store_error("referral store", error)),
        };

        // Bonus goes to both sides, referrer first.
        self.credit_bonus(&request.referrer, "referral bonus").await?;
        self.credit_bonus(&request.referred, "referral signup bonus")
            .await?;

        let total = self
            .referrals
            .count_for_referrer(&request.referrer)
            .await
            .map_err(|error| map_store_error("referral store", error))?;
        let total_i64 = i64::try_from(total).unwrap_or(i64::MAX);
        if let Err(error) = self
            .users
            .set_total_referrals(&request.referrer, total_i64)
            .await
        {
            warn!(user = %request.referrer, %error, "failed to refresh referral counter");
        }

        info!(
            referrer = %request.referrer,
            referred = %request.referred,
            bonus = self.bonus.amount(),
            "referral recorded"
        );
        notify_quietly(
            self.notifications.as_ref(),
            NewNotification::plain(
                request.referrer.clone(),
                NotificationKind::Success,
                "New Referral!",
                format!("A friend joined through your link. You earned {}.", self.bonus),
            ),
        )
        .await;
        notify_quietly(
            self.notifications.as_ref(),
            NewNotification::plain(
                request.referred.clone(),
                NotificationKind::Success,
                "Welcome Bonus!",
                format!("You joined through a referral link and earned {}.", self.bonus),
            ),
        )
        .await;

        Ok(referral)
    }

    async fn summary(&self, user: &TelegramId) -> Result<ReferralSummary, DomainError> {
        let today = self.clock.utc().date_naive();
        let referral_err = |error: StoreError| map_store_error("referral store", error);

        let total = self
            .referrals
            .count_for_referrer(user)
            .await
            .map_err(referral_err)?;
        let today_count = self
            .referrals
            .count_for_referrer_since(user, start_of_day(today))
            .await
            .map_err(referral_err)?;
        let week = self
            .referrals
            .count_for_referrer_since(user, start_of_week(today))
            .await
            .map_err(referral_err)?;
        let month = self
            .referrals
            .count_for_referrer_since(user, start_of_month(today))
            .await
            .map_err(referral_err)?;

        Ok(ReferralSummary {
            total,
            today: today_count,
            this_week: week,
            this_month: month,
            current_level: reached_level(total),
            next_level: next_level(total),
        })
    }
}

#[cfg(test)]
#[path = "referrals_service_tests.rs"]
mod referrals_service_tests;
