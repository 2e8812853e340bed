//! PostgreSQL-backed `UserRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::user::{NewUserRecord, ProfileChanges, UserProfile};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel adapter for the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Changeset for optional profile fields; `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChangesRow<'a> {
    username: Option<&'a str>,
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    photo_url: Option<&'a str>,
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find(&self, id: &TelegramId) -> Result<Option<UserProfile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::telegram_id.eq(id.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn insert(&self, record: &NewUserRecord) -> Result<UserProfile, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                telegram_id: record.telegram_id.as_str(),
                username: record.username.as_deref(),
                first_name: record.first_name.as_deref(),
                last_name: record.last_name.as_deref(),
                photo_url: record.photo_url.as_deref(),
                balance: record.balance.amount(),
                energy: record.energy,
                max_energy: record.max_energy,
                level: record.level,
                referral_code: record.referral_code.as_str(),
                referred_by: record.referred_by.as_ref().map(TelegramId::as_str),
            })
            .returning(UserRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn update_profile(
        &self,
        id: &TelegramId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table)
            .filter(users::telegram_id.eq(id.as_str()))
            .set((
                ProfileChangesRow {
                    username: changes.username.as_deref(),
                    first_name: changes.first_name.as_deref(),
                    last_name: changes.last_name.as_deref(),
                    photo_url: changes.photo_url.as_deref(),
                },
                users::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserRow::as_select())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn set_balances(
        &self,
        id: &TelegramId,
        balance: Taka,
        total_earnings: Taka,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table)
            .filter(users::telegram_id.eq(id.as_str()))
            .set((
                users::balance.eq(balance.amount()),
                users::total_earnings.eq(total_earnings.amount()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_experience(
        &self,
        id: &TelegramId,
        xp: i64,
        level: i32,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table)
            .filter(users::telegram_id.eq(id.as_str()))
            .set((
                users::experience_points.eq(xp),
                users::level.eq(level),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_total_referrals(&self, id: &TelegramId, total: i64) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table)
            .filter(users::telegram_id.eq(id.as_str()))
            .set((
                users::total_referrals.eq(total),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
