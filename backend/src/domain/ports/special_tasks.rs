//! Driving port for special-task UID submission and verification.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::submission::{SpecialTaskSubmission, SubmissionId, UidCheck};
use crate::domain::task::TaskId;

/// Request to submit a UID as evidence of an off-platform signup.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitUidRequest {
    /// The submitting user.
    pub user: TelegramId,
    /// The special task being evidenced.
    pub task_id: TaskId,
    /// The raw UID as typed; trimmed and validated by the workflow.
    pub uid: String,
}

/// Admin verdict on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionVerdict {
    /// Credit the reward and mark verified.
    Verify,
    /// Mark rejected; no reward.
    Reject,
}

/// Request to resolve a pending submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveSubmissionRequest {
    /// The submission to resolve.
    pub submission_id: SubmissionId,
    /// The verdict.
    pub verdict: SubmissionVerdict,
    /// Free-text notes shown to the user on rejection.
    pub notes: Option<String>,
}

/// Special-task operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialTasks: Send + Sync {
    /// Check whether `uid` is available for `task` from `user`'s point of
    /// view.
    async fn check_uid(
        &self,
        user: &TelegramId,
        task: &TaskId,
        uid: &str,
    ) -> Result<UidCheck, DomainError>;

    /// Queue a pending submission after a fresh availability check.
    async fn submit_uid(
        &self,
        request: SubmitUidRequest,
    ) -> Result<SpecialTaskSubmission, DomainError>;

    /// Current state of one of `user`'s submissions, for client polling.
    async fn submission_status(
        &self,
        user: &TelegramId,
        id: &SubmissionId,
    ) -> Result<SpecialTaskSubmission, DomainError>;

    /// `user`'s submissions, newest first.
    async fn submissions(
        &self,
        user: &TelegramId,
    ) -> Result<Vec<SpecialTaskSubmission>, DomainError>;

    /// Resolve a pending submission (admin collaborator transition).
    /// Verification credits the copied reward and notifies; rejection
    /// records the notes and notifies.
    async fn resolve_submission(
        &self,
        request: ResolveSubmissionRequest,
    ) -> Result<SpecialTaskSubmission, DomainError>;
}
