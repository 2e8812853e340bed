//! Task board, completion, and UID submission HTTP handlers.
//!
//! ```text
//! GET  /api/v1/tasks
//! GET  /api/v1/tasks/{task_id}/eligibility
//! POST /api/v1/tasks/{task_id}/complete
//! POST /api/v1/tasks/{task_id}/uid-checks
//! POST /api/v1/tasks/{task_id}/submissions
//! GET  /api/v1/submissions
//! GET  /api/v1/submissions/{submission_id}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CompleteTaskRequest, CompletedTask, SubmitUidRequest, TaskBoard, TaskBoardEntry,
};
use crate::domain::{
    DomainError, SpecialTaskSubmission, SubmissionId, TaskEligibility, TaskId, UidCheck,
};
use crate::inbound::http::auth::TelegramAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{parse_uuid, ApiResult};

/// One task on the board.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskCardResponse {
    /// Template id.
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Reward in whole taka.
    pub reward: i64,
    pub task_type: String,
    pub icon: String,
    pub button_text: String,
    pub cooldown_secs: i64,
    pub max_completions: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_active: bool,
    /// Whether completion goes through UID submission.
    pub special: bool,
    /// Seconds until eligible again; 0 when eligible now.
    pub remaining_cooldown_secs: i64,
    /// Whether a recent completion marks this task done.
    pub completed: bool,
}

impl From<TaskBoardEntry> for TaskCardResponse {
    fn from(entry: TaskBoardEntry) -> Self {
        let special = entry.template.is_special();
        let template = entry.template;
        Self {
            id: template.id.to_string(),
            title: template.title,
            subtitle: template.subtitle,
            description: template.description,
            reward: template.reward.amount(),
            task_type: template.task_type.as_str().to_owned(),
            icon: template.icon,
            button_text: template.button_text,
            cooldown_secs: template.cooldown_secs,
            max_completions: template.max_completions,
            url: template.url,
            is_active: template.is_active,
            special,
            remaining_cooldown_secs: entry.remaining_cooldown_secs,
            completed: entry.completed,
        }
    }
}

/// The assembled task board.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskBoardResponse {
    pub tasks: Vec<TaskCardResponse>,
    pub daily_checkin_done: bool,
    pub streak_days: u32,
}

impl From<TaskBoard> for TaskBoardResponse {
    fn from(board: TaskBoard) -> Self {
        Self {
            tasks: board.tasks.into_iter().map(TaskCardResponse::from).collect(),
            daily_checkin_done: board.daily_checkin_done,
            streak_days: board.streak_days,
        }
    }
}

/// Eligibility check result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub remaining_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
}

impl From<TaskEligibility> for EligibilityResponse {
    fn from(eligibility: TaskEligibility) -> Self {
        Self {
            eligible: eligibility.eligible,
            remaining_secs: eligibility.remaining_secs,
            blocked_by: eligibility.blocked_by.map(|reason| {
                match reason {
                    crate::domain::IneligibilityReason::Inactive => "inactive",
                    crate::domain::IneligibilityReason::Cooldown => "cooldown",
                }
                .to_owned()
            }),
        }
    }
}

/// A recorded completion with the confirmed balance.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTaskResponse {
    pub completion_id: String,
    pub task_id: String,
    /// Reward credited, in whole taka.
    pub reward: i64,
    /// Balance confirmed by the store after crediting.
    pub new_balance: i64,
    /// Cooldown for the client to tick locally, in seconds.
    pub cooldown_secs: i64,
    pub completed_at: String,
}

impl From<CompletedTask> for CompletedTaskResponse {
    fn from(completed: CompletedTask) -> Self {
        Self {
            completion_id: completed.completion.id.as_uuid().to_string(),
            task_id: completed.completion.task_id.to_string(),
            reward: completed.completion.reward.amount(),
            new_balance: completed.new_balance.amount(),
            cooldown_secs: completed.cooldown_secs,
            completed_at: completed.completion.completed_at.to_rfc3339(),
        }
    }
}

/// Body for UID checks and submissions.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UidBody {
    /// The external account identifier as typed.
    pub uid: String,
}

/// Outcome of a UID availability check.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UidCheckResponse {
    /// `available`, `own_submission`, or `used_by_another`.
    pub outcome: String,
    /// Current status of the caller's own submission, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<UidCheck> for UidCheckResponse {
    fn from(check: UidCheck) -> Self {
        match check {
            UidCheck::Available => Self {
                outcome: "available".to_owned(),
                status: None,
            },
            UidCheck::OwnSubmission(status) => Self {
                outcome: "own_submission".to_owned(),
                status: Some(status.as_str().to_owned()),
            },
            UidCheck::UsedByAnother => Self {
                outcome: "used_by_another".to_owned(),
                status: None,
            },
        }
    }
}

/// A UID submission, as stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub task_id: String,
    pub uid: String,
    /// `pending`, `verified`, or `rejected`.
    pub status: String,
    /// Reward copied from the template, in whole taka.
    pub reward: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    pub created_at: String,
}

impl From<SpecialTaskSubmission> for SubmissionResponse {
    fn from(submission: SpecialTaskSubmission) -> Self {
        Self {
            id: submission.id.to_string(),
            task_id: submission.task_id.to_string(),
            uid: submission.uid.to_string(),
            status: submission.status.as_str().to_owned(),
            reward: submission.reward.amount(),
            admin_notes: submission.admin_notes,
            verified_at: submission.verified_at.map(|at| at.to_rfc3339()),
            created_at: submission.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskPath {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionPath {
    submission_id: String,
}

fn parse_task_id(path: TaskPath) -> Result<TaskId, DomainError> {
    parse_uuid(&path.task_id, "taskId").map(TaskId::from_uuid)
}

/// Assemble the caller's task board.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    responses(
        (status = 200, description = "Task board", body = TaskBoardResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "taskBoard"
)]
#[get("/tasks")]
pub async fn task_board(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<TaskBoardResponse>> {
    let board = state.tasks.task_board(auth.user()).await?;
    Ok(web::Json(board.into()))
}

/// Check whether the caller may complete a task right now.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/eligibility",
    responses(
        (status = 200, description = "Eligibility", body = EligibilityResponse),
        (status = 404, description = "Unknown task", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "taskEligibility"
)]
#[get("/tasks/{task_id}/eligibility")]
pub async fn task_eligibility(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
) -> ApiResult<web::Json<EligibilityResponse>> {
    let task_id = parse_task_id(path.into_inner())?;
    let eligibility = state.tasks.eligibility(auth.user(), &task_id).await?;
    Ok(web::Json(eligibility.into()))
}

/// Record a completion and credit the reward.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/complete",
    responses(
        (status = 200, description = "Completion recorded", body = CompletedTaskResponse),
        (status = 404, description = "Unknown task", body = DomainError),
        (status = 409, description = "Cooldown active or task inactive", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "completeTask"
)]
#[post("/tasks/{task_id}/complete")]
pub async fn complete_task(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
) -> ApiResult<web::Json<CompletedTaskResponse>> {
    let task_id = parse_task_id(path.into_inner())?;
    let completed = state
        .tasks
        .complete_task(CompleteTaskRequest {
            user: auth.user().clone(),
            task_id,
        })
        .await?;
    Ok(web::Json(completed.into()))
}

/// Check whether a UID is still available for a special task.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/uid-checks",
    request_body = UidBody,
    responses(
        (status = 200, description = "Check outcome", body = UidCheckResponse),
        (status = 400, description = "Blank UID", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "checkUid"
)]
#[post("/tasks/{task_id}/uid-checks")]
pub async fn check_uid(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
    body: web::Json<UidBody>,
) -> ApiResult<web::Json<UidCheckResponse>> {
    let task_id = parse_task_id(path.into_inner())?;
    let check = state
        .special_tasks
        .check_uid(auth.user(), &task_id, &body.uid)
        .await?;
    Ok(web::Json(check.into()))
}

/// Queue a UID submission for manual verification.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/submissions",
    request_body = UidBody,
    responses(
        (status = 200, description = "Submission queued", body = SubmissionResponse),
        (status = 400, description = "Blank UID or non-special task", body = DomainError),
        (status = 409, description = "UID already used", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "submitUid"
)]
#[post("/tasks/{task_id}/submissions")]
pub async fn submit_uid(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
    body: web::Json<UidBody>,
) -> ApiResult<web::Json<SubmissionResponse>> {
    let task_id = parse_task_id(path.into_inner())?;
    let submission = state
        .special_tasks
        .submit_uid(SubmitUidRequest {
            user: auth.user().clone(),
            task_id,
            uid: body.into_inner().uid,
        })
        .await?;
    Ok(web::Json(submission.into()))
}

/// List the caller's submissions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/submissions",
    responses(
        (status = 200, description = "Submissions", body = [SubmissionResponse])
    ),
    tags = ["tasks"],
    operation_id = "listSubmissions"
)]
#[get("/submissions")]
pub async fn list_submissions(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<SubmissionResponse>>> {
    let submissions = state.special_tasks.submissions(auth.user()).await?;
    Ok(web::Json(
        submissions.into_iter().map(SubmissionResponse::from).collect(),
    ))
}

/// Poll one submission's status.
#[utoipa::path(
    get,
    path = "/api/v1/submissions/{submission_id}",
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 403, description = "Belongs to another user", body = DomainError),
        (status = 404, description = "Unknown submission", body = DomainError)
    ),
    tags = ["tasks"],
    operation_id = "submissionStatus"
)]
#[get("/submissions/{submission_id}")]
pub async fn submission_status(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    path: web::Path<SubmissionPath>,
) -> ApiResult<web::Json<SubmissionResponse>> {
    let id = parse_uuid(&path.submission_id, "submissionId").map(SubmissionId::from_uuid)?;
    let submission = state
        .special_tasks
        .submission_status(auth.user(), &id)
        .await?;
    Ok(web::Json(submission.into()))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tasks_tests;
