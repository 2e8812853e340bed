//! Task completion facts and eligibility results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::TelegramId;
use super::money::Taka;
use super::task::{TaskId, TaskType};

/// Identifier of a recorded completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CompletionId(Uuid);

impl CompletionId {
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

/// One instance of a user completing a task. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    /// Row identifier.
    pub id: CompletionId,
    /// The completing user.
    pub user: TelegramId,
    /// The completed template.
    pub task_id: TaskId,
    /// Template category at completion time.
    pub task_type: TaskType,
    /// Template title at completion time.
    pub task_title: String,
    /// Reward credited for this completion.
    pub reward: Taka,
    /// When the completion was recorded.
    pub completed_at: DateTime<Utc>,
}

/// Fields required to record a new completion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompletion {
    /// The completing user.
    pub user: TelegramId,
    /// The completed template.
    pub task_id: TaskId,
    /// Template category at completion time.
    pub task_type: TaskType,
    /// Template title at completion time.
    pub task_title: String,
    /// Reward to credit.
    pub reward: Taka,
    /// Completion instant, taken from the service clock.
    pub completed_at: DateTime<Utc>,
}

/// Why a task cannot be completed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IneligibilityReason {
    /// The template is deactivated.
    Inactive,
    /// A prior completion is still inside the cooldown window.
    Cooldown,
}

/// Outcome of an eligibility check: a yes/no plus the remaining cooldown
/// (0 when eligible).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEligibility {
    /// Whether the task may be completed now.
    pub eligible: bool,
    /// Seconds until the task becomes eligible again; 0 when eligible.
    pub remaining_secs: i64,
    /// Present when `eligible` is false.
    pub blocked_by: Option<IneligibilityReason>,
}

impl TaskEligibility {
    /// The task may be completed now.
    pub const fn eligible() -> Self {
        Self {
            eligible: true,
            remaining_secs: 0,
            blocked_by: None,
        }
    }

    /// The template is deactivated.
    pub const fn inactive() -> Self {
        Self {
            eligible: false,
            remaining_secs: 0,
            blocked_by: Some(IneligibilityReason::Inactive),
        }
    }

    /// A prior completion is still cooling down.
    pub const fn cooling_down(remaining_secs: i64) -> Self {
        Self {
            eligible: false,
            remaining_secs,
            blocked_by: Some(IneligibilityReason::Cooldown),
        }
    }
}
