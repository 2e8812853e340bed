//! PostgreSQL-backed `ReferralRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::ports::{ReferralRepository, StoreError};
use crate::domain::referral::{NewReferral, Referral};

use super::diesel_helpers::{count_to_u64, map_diesel_error, map_pool_error};
use super::models::{NewReferralRow, ReferralRow};
use super::pool::DbPool;
use super::schema::referrals;

/// Diesel adapter for the referral repository port.
#[derive(Clone)]
pub struct DieselReferralRepository {
    pool: DbPool,
}

impl DieselReferralRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferralRepository for DieselReferralRepository {
    async fn exists_for_referred(&self, referred: &TelegramId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            referrals::table.filter(referrals::referred_id.eq(referred.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, referral: &NewReferral) -> Result<Referral, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ReferralRow = diesel::insert_into(referrals::table)
            .values(&NewReferralRow {
                referrer_id: referral.referrer.as_str(),
                referred_id: referral.referred.as_str(),
                reward_amount: referral.reward.amount(),
            })
            .returning(ReferralRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn count_for_referrer(&self, referrer: &TelegramId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = referrals::table
            .filter(referrals::referrer_id.eq(referrer.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u64(count))
    }

    async fn count_for_referrer_since(
        &self,
        referrer: &TelegramId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = referrals::table
            .filter(referrals::referrer_id.eq(referrer.as_str()))
            .filter(referrals::created_at.ge(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_u64(count))
    }
}
