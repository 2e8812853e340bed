//! PostgreSQL-backed `WithdrawalRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::ports::{StoreError, WithdrawalRepository};
use crate::domain::withdrawal::{
    NewWithdrawal, WithdrawalId, WithdrawalRequest, WithdrawalStatus,
};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewWithdrawalRow, WithdrawalRow};
use super::pool::DbPool;
use super::schema::withdrawal_requests;

/// Diesel adapter for the withdrawal repository port.
#[derive(Clone)]
pub struct DieselWithdrawalRepository {
    pool: DbPool,
}

impl DieselWithdrawalRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WithdrawalRepository for DieselWithdrawalRepository {
    async fn insert(&self, withdrawal: &NewWithdrawal) -> Result<WithdrawalRequest, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: WithdrawalRow = diesel::insert_into(withdrawal_requests::table)
            .values(&NewWithdrawalRow {
                user_id: withdrawal.user.as_str(),
                amount: withdrawal.amount.amount(),
                method: withdrawal.method.as_str(),
                account_number: withdrawal.account_number.as_str(),
                account_name: withdrawal.account_name.as_str(),
                bank_name: withdrawal.bank_name.as_deref(),
                crypto_symbol: withdrawal.crypto_symbol.as_deref(),
                status: WithdrawalStatus::Pending.as_str(),
                created_at: withdrawal.created_at,
            })
            .returning(WithdrawalRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn list_for_user(
        &self,
        user: &TelegramId,
        limit: i64,
    ) -> Result<Vec<WithdrawalRequest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WithdrawalRow> = withdrawal_requests::table
            .filter(withdrawal_requests::user_id.eq(user.as_str()))
            .order(withdrawal_requests::created_at.desc())
            .limit(limit)
            .select(WithdrawalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(WithdrawalRow::into_domain).collect()
    }

    async fn find(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WithdrawalRow> = withdrawal_requests::table
            .filter(withdrawal_requests::id.eq(id.as_uuid()))
            .select(WithdrawalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(WithdrawalRow::into_domain).transpose()
    }

    async fn mark_resolved(
        &self,
        id: &WithdrawalId,
        status: WithdrawalStatus,
        admin_notes: Option<String>,
        processed_at: DateTime<Utc>,
    ) -> Result<Option<WithdrawalRequest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WithdrawalRow> = diesel::update(withdrawal_requests::table)
            .filter(withdrawal_requests::id.eq(id.as_uuid()))
            .set((
                withdrawal_requests::status.eq(status.as_str()),
                withdrawal_requests::admin_notes.eq(admin_notes),
                withdrawal_requests::processed_at.eq(processed_at),
            ))
            .returning(WithdrawalRow::as_select())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(WithdrawalRow::into_domain).transpose()
    }
}
