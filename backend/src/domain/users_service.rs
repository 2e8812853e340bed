//! User directory service: session hydration, profile maintenance, and
//! derived stats.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{notify_quietly, NewNotification, NotificationKind};
use crate::domain::ports::{
    map_store_error, CompletionRepository, EarningsRepository, NotificationRepository,
    ReferralRepository, StoreError, UserDirectory, UserRepository,
};
use crate::domain::schedule::{start_of_day, start_of_month, start_of_week};
use crate::domain::user::{
    level_for_xp, NewUserRecord, ProfileChanges, UserIdentity, UserProfile, UserStats,
};

/// Domain service implementing the user directory driving port.
pub struct UserDirectoryService<U, R, C, E, N> {
    users: Arc<U>,
    referrals: Arc<R>,
    completions: Arc<C>,
    earnings: Arc<E>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<U, R, C, E, N> UserDirectoryService<U, R, C, E, N> {
    /// Create a new service over the given repositories.
    pub fn new(
        users: Arc<U>,
        referrals: Arc<R>,
        completions: Arc<C>,
        earnings: Arc<E>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            referrals,
            completions,
            earnings,
            notifications,
            clock,
        }
    }
}

#[async_trait]
impl<U, R, C, E, N> UserDirectory for UserDirectoryService<U, R, C, E, N>
where
    U: UserRepository,
    R: ReferralRepository,
    C: CompletionRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn load_or_create(&self, identity: UserIdentity) -> Result<UserProfile, DomainError> {
        if let Some(profile) = self
            .users
            .find(&identity.telegram_id)
            .await
            .map_err(|error| map_store_error("user store", error))?
        {
            return Ok(profile);
        }

        match self.users.insert(&NewUserRecord::for_identity(&identity)).await {
            Ok(profile) => {
                info!(user = %profile.telegram_id, "created user account");
                Ok(profile)
            }
            // Two first loads raced; the other one created the row.
            Err(StoreError::Duplicate { .. }) => self
                .users
                .find(&identity.telegram_id)
                .await
                .map_err(|error| map_store_error("user store", error))?
                .ok_or_else(|| {
                    DomainError::internal("user row disappeared during create race")
                }),
            Err(error) => Err(map_store_error("user store", error)),
        }
    }

    async fn profile(&self, user: &TelegramId) -> Result<UserProfile, DomainError> {
        self.users
            .find(user)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn update_profile(
        &self,
        user: &TelegramId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, DomainError> {
        if changes.is_empty() {
            return self.profile(user).await;
        }
        self.users
            .update_profile(user, &changes)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn stats(&self, user: &TelegramId) -> Result<UserStats, DomainError> {
        let today = self.clock.utc().date_naive();
        let day_start = start_of_day(today);
        let week_start = start_of_week(today);
        let month_start = start_of_month(today);

        let referral_err = |error: StoreError| map_store_error("referral store", error);
        let total_referrals = self
            .referrals
            .count_for_referrer(user)
            .await
            .map_err(referral_err)?;
        let today_referrals = self
            .referrals
            .count_for_referrer_since(user, day_start)
            .await
            .map_err(referral_err)?;
        let week_referrals = self
            .referrals
            .count_for_referrer_since(user, week_start)
            .await
            .map_err(referral_err)?;
        let month_referrals = self
            .referrals
            .count_for_referrer_since(user, month_start)
            .await
            .map_err(referral_err)?;

        let tasks_completed = self
            .completions
            .count_for(user)
            .await
            .map_err(|error| map_store_error("completion store", error))?;

        let ledger_err = |error: StoreError| map_store_error("earnings ledger", error);
        let total_earnings = self.earnings.total_for(user).await.map_err(ledger_err)?;
        let today_earnings = self
            .earnings
            .total_since(user, day_start)
            .await
            .map_err(ledger_err)?;
        let week_earnings = self
            .earnings
            .total_since(user, week_start)
            .await
            .map_err(ledger_err)?;
        let month_earnings = self
            .earnings
            .total_since(user, month_start)
            .await
            .map_err(ledger_err)?;

        Ok(UserStats {
            total_referrals,
            today_referrals,
            week_referrals,
            month_referrals,
            tasks_completed,
            total_earnings,
            today_earnings,
            week_earnings,
            month_earnings,
        })
    }

    async fn grant_experience(
        &self,
        user: &TelegramId,
        xp: i64,
    ) -> Result<UserProfile, DomainError> {
        let mut profile = self.profile(user).await?;
        let new_xp = profile
            .experience_points
            .checked_add(xp)
            .ok_or_else(|| DomainError::internal("experience overflow"))?;
        let new_level = level_for_xp(new_xp);
        self.users
            .set_experience(user, new_xp, new_level)
            .await
            .map_err(|error| map_store_error("user store", error))?;

        if new_level > profile.level {
            notify_quietly(
                self.notifications.as_ref(),
                NewNotification::plain(
                    user.clone(),
                    NotificationKind::Info,
                    "Level Up!",
                    format!("You reached level {new_level}."),
                ),
            )
            .await;
        }

        profile.experience_points = new_xp;
        profile.level = new_level;
        Ok(profile)
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod users_service_tests;
