//! Special-task UID submission and verification service.
//!
//! Submissions evidence an off-platform signup with an external UID. The
//! UID must be globally unique per task: the service pre-checks so the
//! client can be told who holds the UID, and the store's uniqueness
//! constraint arbitrates races the pre-check cannot see. Crediting happens
//! only on the admin verification transition.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{notify_quietly, NewNotification, NotificationKind};
use crate::domain::ports::{
    map_store_error, EarningSource, EarningsRepository, NewEarning, NotificationRepository,
    ResolveSubmissionRequest, SpecialTasks, StoreError, SubmissionRepository, SubmissionVerdict,
    SubmitUidRequest, TaskTemplateRepository, UserRepository,
};
use crate::domain::submission::{
    NewSubmission, SpecialTaskSubmission, SubmissionId, SubmissionStatus, SubmittedUid, UidCheck,
};
use crate::domain::task::TaskId;

/// Domain service implementing the special-tasks driving port.
pub struct SpecialTasksService<S, T, U, E, N> {
    submissions: Arc<S>,
    templates: Arc<T>,
    users: Arc<U>,
    earnings: Arc<E>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<S, T, U, E, N> SpecialTasksService<S, T, U, E, N> {
    /// Create a new service over the given repositories.
    pub fn new(
        submissions: Arc<S>,
        templates: Arc<T>,
        users: Arc<U>,
        earnings: Arc<E>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            submissions,
            templates,
            users,
            earnings,
            notifications,
            clock,
        }
    }
}

impl<S, T, U, E, N> SpecialTasksService<S, T, U, E, N>
where
    S: SubmissionRepository,
    T: TaskTemplateRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn uid_check(
        &self,
        user: &TelegramId,
        task: &TaskId,
        uid: &SubmittedUid,
    ) -> Result<UidCheck, DomainError> {
        let existing = self
            .submissions
            .find_for_uid(task, uid)
            .await
            .map_err(|error| map_store_error("submission store", error))?;

        Ok(match existing {
            None => UidCheck::Available,
            Some(submission) if submission.user == *user => {
                UidCheck::OwnSubmission(submission.status)
            }
            Some(_) => UidCheck::UsedByAnother,
        })
    }

    fn taken_error(check: UidCheck) -> DomainError {
        match check {
            UidCheck::OwnSubmission(status) => {
                DomainError::conflict("UID already submitted by you")
                    .with_details(json!({ "status": status.as_str() }))
            }
            _ => DomainError::conflict("UID used by another user"),
        }
    }

    /// An insert lost the uniqueness race; re-read to report the winner.
    async fn resolve_duplicate(
        &self,
        user: &TelegramId,
        task: &TaskId,
        uid: &SubmittedUid,
    ) -> DomainError {
        match self.uid_check(user, task, uid).await {
            Ok(UidCheck::Available) => {
                DomainError::internal("submission disappeared during race resolution")
            }
            Ok(check) => Self::taken_error(check),
            Err(error) => error,
        }
    }

    async fn credit_verified(&self, submission: &SpecialTaskSubmission) -> Result<(), DomainError> {
        let profile = self
            .users
            .find(&submission.user)
            .await
            .map_err(|error| map_store_error("user store", error))?
            .ok_or_else(|| DomainError::internal("submitter has no user row"))?;

        let new_balance = profile
            .balance
            .checked_add(submission.reward)
            .ok_or_else(|| DomainError::internal("balance overflow"))?;
        let new_total = profile
            .total_earnings
            .checked_add(submission.reward)
            .ok_or_else(|| DomainError::internal("total earnings overflow"))?;
        self.users
            .set_balances(&submission.user, new_balance, new_total)
            .await
            .map_err(|error| map_store_error("user store", error))?;

        if let Err(error) = self
            .earnings
            .insert(&NewEarning {
                user: submission.user.clone(),
                amount: submission.reward,
                source: EarningSource::Bonus,
                description: format!("special task verified ({})", submission.uid),
            })
            .await
        {
            warn!(user = %submission.user, %error, "failed to append earnings ledger entry");
        }
        Ok(())
    }
}

#[async_trait]
impl<S, T, U, E, N> SpecialTasks for SpecialTasksService<S, T, U, E, N>
where
    S: SubmissionRepository,
    T: TaskTemplateRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn check_uid(
        &self,
        user: &TelegramId,
        task: &TaskId,
        uid: &str,
    ) -> Result<UidCheck, DomainError> {
        let uid = SubmittedUid::new(uid)
            .map_err(|error| DomainError::invalid_request(error.to_string()))?;
        self.uid_check(user, task, &uid).await
    }

    async fn submit_uid(
        &self,
        request: SubmitUidRequest,
    ) -> Result<SpecialTaskSubmission, DomainError> {
        let uid = SubmittedUid::new(&request.uid)
            .map_err(|error| DomainError::invalid_request(error.to_string()))?;

        let template = self
            .templates
            .find(&request.task_id)
            .await
            .map_err(|error| map_store_error("task store", error))?
            .ok_or_else(|| DomainError::not_found("task not found"))?;
        if !template.is_special() {
            return Err(DomainError::invalid_request(
                "task does not take UID submissions",
            ));
        }

        // Best-effort pre-check so the caller learns who holds the UID.
        // The check and the insert are separate round-trips; the store's
        // uniqueness constraint arbitrates whatever slips between them.
        match self.uid_check(&request.user, &request.task_id, &uid).await? {
            UidCheck::Available => {}
            check => return Err(Self::taken_error(check)),
        }

        let submission = match self
            .submissions
            .insert(&NewSubmission {
                user: request.user.clone(),
                task_id: template.id,
                task_type: template.task_type,
                uid: uid.clone(),
                reward: template.reward,
                created_at: self.clock.utc(),
            })
            .await
        {
            Ok(submission) => submission,
            Err(StoreError::Duplicate { .. }) => {
                return Err(self
                    .resolve_duplicate(&request.user, &request.task_id, &uid)
                    .await);
            }
            Err(error) => return Err(map_store_error("submission store", error)),
        };

        info!(
            user = %request.user,
            task = %template.id,
            submission = %submission.id,
            "UID submission queued"
        );
        notify_quietly(
            self.notifications.as_ref(),
            NewNotification::plain(
                request.user,
                NotificationKind::Success,
                "UID Submitted!",
                "UID submitted for approval.",
            ),
        )
        .await;

        Ok(submission)
    }

    async fn submission_status(
        &self,
        user: &TelegramId,
        id: &SubmissionId,
    ) -> Result<SpecialTaskSubmission, DomainError> {
        let submission = self
            .submissions
            .find(id)
            .await
            .map_err(|error| map_store_error("submission store", error))?
            .ok_or_else(|| DomainError::not_found("submission not found"))?;
        if submission.user != *user {
            return Err(DomainError::forbidden(
                "submission belongs to another user",
            ));
        }
        Ok(submission)
    }

    async fn submissions(
        &self,
        user: &TelegramId,
    ) -> Result<Vec<SpecialTaskSubmission>, DomainError> {
        self.submissions
            .list_for_user(user)
            .await
            .map_err(|error| map_store_error("submission store", error))
    }

    async fn resolve_submission(
        &self,
        request: ResolveSubmissionRequest,
    ) -> Result<SpecialTaskSubmission, DomainError> {
        let submission = self
            .submissions
            .find(&request.submission_id)
            .await
            .map_err(|error| map_store_error("submission store", error))?
            .ok_or_else(|| DomainError::not_found("submission not found"))?;
        if submission.status != SubmissionStatus::Pending {
            return Err(DomainError::conflict("submission already resolved"));
        }

        let (status, verified_at) = match request.verdict {
            SubmissionVerdict::Verify => (SubmissionStatus::Verified, Some(self.clock.utc())),
            SubmissionVerdict::Reject => (SubmissionStatus::Rejected, None::<chrono::DateTime<Utc>>),
        };

        let updated = self
            .submissions
            .mark_resolved(
                &request.submission_id,
                status,
                request.notes.clone(),
                verified_at,
            )
            .await
            .map_err(|error| map_store_error("submission store", error))?
            .ok_or_else(|| DomainError::internal("submission vanished during resolution"))?;

        match request.verdict {
            SubmissionVerdict::Verify => {
                self.credit_verified(&updated).await?;
                notify_quietly(
                    self.notifications.as_ref(),
                    NewNotification::plain(
                        updated.user.clone(),
                        NotificationKind::Success,
                        "UID Verified!",
                        format!("You received {} reward.", updated.reward),
                    ),
                )
                .await;
            }
            SubmissionVerdict::Reject => {
                let reason = request
                    .notes
                    .clone()
                    .unwrap_or_else(|| "UID verification rejected.".to_owned());
                notify_quietly(
                    self.notifications.as_ref(),
                    NewNotification::plain(
                        updated.user.clone(),
                        NotificationKind::Error,
                        "UID Rejected",
                        reason,
                    ),
                )
                .await;
            }
        }

        Ok(updated)
    }
}

#[cfg(test)]
#[path = "special_tasks_service_tests.rs"]
mod special_tasks_service_tests;
