//! Special-task UID submissions.
//!
//! A special task is completed off-platform; the user proves it by
//! submitting the external account's UID. Submissions queue as `pending`
//! and are resolved manually by the admin collaborator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::TelegramId;
use super::money::Taka;
use super::task::{TaskId, TaskType};

/// Identifier of a submission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a random id. Primarily useful for tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors for [`SubmittedUid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UidValidationError {
    /// The UID was empty after trimming.
    #[error("UID must not be empty")]
    Empty,
}

/// A user-supplied external account identifier, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct SubmittedUid(String);

impl SubmittedUid {
    /// Trim and validate a raw UID string.
    ///
    /// # Errors
    ///
    /// Returns [`UidValidationError::Empty`] when nothing remains after
    /// trimming whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UidValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UidValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The trimmed UID string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SubmittedUid {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubmittedUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<SubmittedUid> for String {
    fn from(value: SubmittedUid) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubmittedUid {
    type Error = UidValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Error parsing an unknown submission status tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission status: {0}")]
pub struct ParseSubmissionStatusError(pub String);

/// Lifecycle state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Queued for manual review.
    Pending,
    /// Verified by the admin collaborator; reward credited.
    Verified,
    /// Rejected by the admin collaborator; no reward.
    Rejected,
}

impl SubmissionStatus {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = ParseSubmissionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseSubmissionStatusError(other.to_owned())),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded UID submission for a special task.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTaskSubmission {
    /// Row identifier.
    pub id: SubmissionId,
    /// The submitting user.
    pub user: TelegramId,
    /// The special task the UID is evidence for.
    pub task_id: TaskId,
    /// Template category at submission time.
    pub task_type: TaskType,
    /// The submitted external identifier.
    pub uid: SubmittedUid,
    /// Current lifecycle state.
    pub status: SubmissionStatus,
    /// Reward copied from the template at submission time.
    pub reward: Taka,
    /// Free-text notes recorded by the admin collaborator.
    pub admin_notes: Option<String>,
    /// When the submission was verified, if it was.
    pub verified_at: Option<DateTime<Utc>>,
    /// When the submission was created.
    pub created_at: DateTime<Utc>,
}

/// Fields required to record a new submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    /// The submitting user.
    pub user: TelegramId,
    /// The special task the UID is evidence for.
    pub task_id: TaskId,
    /// Template category at submission time.
    pub task_type: TaskType,
    /// The submitted external identifier.
    pub uid: SubmittedUid,
    /// Reward copied from the template.
    pub reward: Taka,
    /// Submission instant, taken from the service clock.
    pub created_at: DateTime<Utc>,
}

/// Outcome of the global UID availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidCheck {
    /// No submission exists for this (task, UID) pair.
    Available,
    /// The caller already submitted this UID for this task; carries the
    /// submission's current status so the client can short-circuit.
    OwnSubmission(SubmissionStatus),
    /// Another user already submitted this UID for this task. Rejected
    /// unconditionally, regardless of that submission's status.
    UsedByAnother,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn uid_is_trimmed() {
        let uid = SubmittedUid::new("  ABC123  ").expect("valid uid");
        assert_eq!(uid.as_str(), "ABC123");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_uid_is_rejected(#[case] raw: &str) {
        assert_eq!(SubmittedUid::new(raw), Err(UidValidationError::Empty));
    }

    #[rstest]
    #[case("pending", SubmissionStatus::Pending)]
    #[case("verified", SubmissionStatus::Verified)]
    #[case("rejected", SubmissionStatus::Rejected)]
    fn status_tags_round_trip(#[case] tag: &str, #[case] status: SubmissionStatus) {
        assert_eq!(tag.parse::<SubmissionStatus>(), Ok(status));
        assert_eq!(status.as_str(), tag);
    }
}
