//! PostgreSQL-backed `SubmissionRepository` implementation.
//!
//! The `(task_id, uid_submitted)` unique index makes the insert the
//! arbitration point for concurrent submissions of the same UID; a lost
//! race surfaces as `StoreError::Duplicate` via the shared error mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::identity::TelegramId;
use crate::domain::ports::{StoreError, SubmissionRepository};
use crate::domain::submission::{
    NewSubmission, SpecialTaskSubmission, SubmissionId, SubmissionStatus, SubmittedUid,
};
use crate::domain::task::TaskId;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewSubmissionRow, SubmissionRow};
use super::pool::DbPool;
use super::schema::special_task_submissions;

/// Diesel adapter for the submission repository port.
#[derive(Clone)]
pub struct DieselSubmissionRepository {
    pool: DbPool,
}

impl DieselSubmissionRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for DieselSubmissionRepository {
    async fn find_for_uid(
        &self,
        task: &TaskId,
        uid: &SubmittedUid,
    ) -> Result<Option<SpecialTaskSubmission>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubmissionRow> = special_task_submissions::table
            .filter(special_task_submissions::task_id.eq(task.as_uuid()))
            .filter(special_task_submissions::uid_submitted.eq(uid.as_str()))
            .order(special_task_submissions::created_at.desc())
            .select(SubmissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(SubmissionRow::into_domain).transpose()
    }

    async fn insert(
        &self,
        submission: &NewSubmission,
    ) -> Result<SpecialTaskSubmission, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SubmissionRow = diesel::insert_into(special_task_submissions::table)
            .values(&NewSubmissionRow {
                user_id: submission.user.as_str(),
                task_id: *submission.task_id.as_uuid(),
                task_type: submission.task_type.as_str(),
                uid_submitted: submission.uid.as_str(),
                status: SubmissionStatus::Pending.as_str(),
                reward_amount: submission.reward.amount(),
                created_at: submission.created_at,
            })
            .returning(SubmissionRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn find(&self, id: &SubmissionId) -> Result<Option<SpecialTaskSubmission>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubmissionRow> = special_task_submissions::table
            .filter(special_task_submissions::id.eq(id.as_uuid()))
            .select(SubmissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(SubmissionRow::into_domain).transpose()
    }

    async fn list_for_user(
        &self,
        user: &TelegramId,
    ) -> Result<Vec<SpecialTaskSubmission>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubmissionRow> = special_task_submissions::table
            .filter(special_task_submissions::user_id.eq(user.as_str()))
            .order(special_task_submissions::created_at.desc())
            .select(SubmissionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(SubmissionRow::into_domain).collect()
    }

    async fn mark_resolved(
        &self,
        id: &SubmissionId,
        status: SubmissionStatus,
        admin_notes: Option<String>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Option<SpecialTaskSubmission>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubmissionRow> = diesel::update(special_task_submissions::table)
            .filter(special_task_submissions::id.eq(id.as_uuid()))
            .set((
                special_task_submissions::status.eq(status.as_str()),
                special_task_submissions::admin_notes.eq(admin_notes),
                special_task_submissions::verified_at.eq(verified_at),
            ))
            .returning(SubmissionRow::as_select())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(SubmissionRow::into_domain).transpose()
    }
}
