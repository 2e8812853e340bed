//! Port abstraction for special-task UID submissions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::identity::TelegramId;
use crate::domain::submission::{
    NewSubmission, SpecialTaskSubmission, SubmissionId, SubmissionStatus, SubmittedUid,
};
use crate::domain::task::TaskId;

use super::StoreError;

/// Port over the submission table.
///
/// The store carries a uniqueness constraint on `(task_id, uid_submitted)`;
/// [`SubmissionRepository::insert`] surfaces a lost race as
/// [`StoreError::Duplicate`] so the workflow can re-read and report the
/// winner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// The newest submission of `uid` for `task`, regardless of submitter.
    async fn find_for_uid(
        &self,
        task: &TaskId,
        uid: &SubmittedUid,
    ) -> Result<Option<SpecialTaskSubmission>, StoreError>;

    /// Record a pending submission.
    ///
    /// Returns [`StoreError::Duplicate`] when the `(task, uid)` pair
    /// already exists.
    async fn insert(&self, submission: &NewSubmission)
    -> Result<SpecialTaskSubmission, StoreError>;

    /// Fetch a submission by id.
    async fn find(&self, id: &SubmissionId) -> Result<Option<SpecialTaskSubmission>, StoreError>;

    /// Submissions by `user`, newest first.
    async fn list_for_user(
        &self,
        user: &TelegramId,
    ) -> Result<Vec<SpecialTaskSubmission>, StoreError>;

    /// Transition a submission's lifecycle state and return the updated
    /// row.
    async fn mark_resolved(
        &self,
        id: &SubmissionId,
        status: SubmissionStatus,
        admin_notes: Option<String>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Option<SpecialTaskSubmission>, StoreError>;
}
