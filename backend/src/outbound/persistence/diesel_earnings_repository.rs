//! PostgreSQL-backed `EarningsRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{EarningsRepository, NewEarning, StoreError};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::NewEarningRow;
use super::pool::DbPool;
use super::schema::earnings;

/// Diesel adapter for the earnings ledger port.
#[derive(Clone)]
pub struct DieselEarningsRepository {
    pool: DbPool,
}

impl DieselEarningsRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EarningsRepository for DieselEarningsRepository {
    async fn insert(&self, earning: &NewEarning) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(earnings::table)
            .values(&NewEarningRow {
                user_id: earning.user.as_str(),
                amount: earning.amount.amount(),
                source: earning.source.as_str(),
                description: earning.description.as_str(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn total_for(&self, user: &TelegramId) -> Result<Taka, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = earnings::table
            .filter(earnings::user_id.eq(user.as_str()))
            .select(sql::<BigInt>("COALESCE(SUM(amount), 0)"))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Taka::new(total))
    }

    async fn total_since(
        &self,
        user: &TelegramId,
        since: DateTime<Utc>,
    ) -> Result<Taka, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = earnings::table
            .filter(earnings::user_id.eq(user.as_str()))
            .filter(earnings::created_at.ge(since))
            .select(sql::<BigInt>("COALESCE(SUM(amount), 0)"))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Taka::new(total))
    }
}
