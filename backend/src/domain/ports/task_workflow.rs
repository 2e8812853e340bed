//! Driving port for the task eligibility and completion workflow.

use async_trait::async_trait;

use crate::domain::completion::{TaskCompletion, TaskEligibility};
use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::task::{TaskId, TaskTemplate};

/// One task on the board, annotated with the caller's state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBoardEntry {
    /// The template definition.
    pub template: TaskTemplate,
    /// Seconds until this task is eligible again; 0 when eligible now.
    pub remaining_cooldown_secs: i64,
    /// Whether a recent completion marks this task done (inside the
    /// cooldown window, or at all for tasks without a cooldown).
    pub completed: bool,
}

/// Everything the tasks screen shows, assembled in one read.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBoard {
    /// Active templates with per-caller state.
    pub tasks: Vec<TaskBoardEntry>,
    /// Whether today's check-in is already recorded.
    pub daily_checkin_done: bool,
    /// Consecutive-day completion streak.
    pub streak_days: u32,
}

/// Request to complete a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteTaskRequest {
    /// The completing user.
    pub user: TelegramId,
    /// The task to complete.
    pub task_id: TaskId,
}

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTask {
    /// The recorded completion fact.
    pub completion: TaskCompletion,
    /// The balance confirmed by the store after crediting.
    pub new_balance: Taka,
    /// The cooldown the client should start ticking locally, in seconds.
    pub cooldown_secs: i64,
}

/// Task eligibility and completion operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskWorkflow: Send + Sync {
    /// Assemble the task board for `user`.
    async fn task_board(&self, user: &TelegramId) -> Result<TaskBoard, DomainError>;

    /// Check whether `user` may complete `task` right now.
    async fn eligibility(
        &self,
        user: &TelegramId,
        task: &TaskId,
    ) -> Result<TaskEligibility, DomainError>;

    /// Record a completion and credit the reward.
    ///
    /// Eligibility is re-checked at action time; the check and the write
    /// remain two separate store round-trips.
    async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> Result<CompletedTask, DomainError>;
}
