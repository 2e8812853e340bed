//! Admin console HTTP handlers.
//!
//! ```text
//! POST /api/v1/admin/submissions/{submission_id}/resolve
//! POST /api/v1/admin/withdrawals/{withdrawal_id}/resolve
//! POST /api/v1/admin/users/{telegram_id}/experience
//! POST /api/v1/admin/telegram/message
//! PUT  /api/v1/admin/telegram/commands
//! ```
//!
//! All endpoints require the shared admin token. These are the state
//! transitions the admin console performs; the console UI itself lives
//! elsewhere.

use std::sync::Arc;

use actix_web::{post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    ResolveSubmissionRequest, ResolveWithdrawalRequest, SubmissionVerdict, WithdrawalVerdict,
};
use crate::domain::{DomainError, SubmissionId, TelegramId, WithdrawalId};
use crate::inbound::http::auth::AdminAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::SubmissionResponse;
use crate::inbound::http::wallet::WithdrawalResponse;
use crate::inbound::http::users::ProfileResponse;
use crate::inbound::http::{parse_uuid, ApiResult};
use crate::outbound::telegram::{BotCommand, TelegramClient};

/// Optional Telegram relay, present when a bot token is configured.
#[derive(Clone, Default)]
pub struct TelegramRelay {
    client: Option<Arc<TelegramClient>>,
}

impl TelegramRelay {
    /// A relay backed by a configured client.
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A relay without a configured bot token.
    pub fn disabled() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&TelegramClient, DomainError> {
        self.client
            .as_deref()
            .ok_or_else(|| DomainError::service_unavailable("telegram bot token not configured"))
    }
}

/// Body for resolving a UID submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveSubmissionBody {
    /// `verify` or `reject`.
    pub verdict: String,
    pub notes: Option<String>,
}

/// Body for resolving a withdrawal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveWithdrawalBody {
    /// `approve` or `reject`.
    pub verdict: String,
    pub notes: Option<String>,
}

/// Body for granting experience points.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantExperienceBody {
    /// Experience points to add.
    pub xp: i64,
}

/// Body for sending a manual test message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelegramMessageBody {
    /// Target chat id.
    pub chat_id: String,
    /// Message text.
    pub text: String,
}

/// One bot menu command.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BotCommandBody {
    pub command: String,
    pub description: String,
}

/// Body for replacing the bot command menu.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BotCommandsBody {
    pub commands: Vec<BotCommandBody>,
}

#[derive(Debug, Deserialize)]
struct SubmissionPath {
    submission_id: String,
}

#[derive(Debug, Deserialize)]
struct WithdrawalPath {
    withdrawal_id: String,
}

#[derive(Debug, Deserialize)]
struct UserPath {
    telegram_id: String,
}

/// Resolve a pending UID submission; verification credits the reward.
#[utoipa::path(
    post,
    path = "/api/v1/admin/submissions/{submission_id}/resolve",
    request_body = ResolveSubmissionBody,
    responses(
        (status = 200, description = "Resolved submission", body = SubmissionResponse),
        (status = 409, description = "Already resolved", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "resolveSubmission"
)]
#[post("/admin/submissions/{submission_id}/resolve")]
pub async fn resolve_submission(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
    path: web::Path<SubmissionPath>,
    body: web::Json<ResolveSubmissionBody>,
) -> ApiResult<web::Json<SubmissionResponse>> {
    let id = parse_uuid(&path.submission_id, "submissionId").map(SubmissionId::from_uuid)?;
    let body = body.into_inner();
    let verdict = match body.verdict.as_str() {
        "verify" => SubmissionVerdict::Verify,
        "reject" => SubmissionVerdict::Reject,
        other => {
            return Err(DomainError::invalid_request(format!(
                "unknown verdict: {other}"
            )));
        }
    };
    let submission = state
        .special_tasks
        .resolve_submission(ResolveSubmissionRequest {
            submission_id: id,
            verdict,
            notes: body.notes,
        })
        .await?;
    Ok(web::Json(submission.into()))
}

/// Resolve a pending withdrawal; rejection refunds unless the notes
/// classify it as forfeited.
#[utoipa::path(
    post,
    path = "/api/v1/admin/withdrawals/{withdrawal_id}/resolve",
    request_body = ResolveWithdrawalBody,
    responses(
        (status = 200, description = "Resolved withdrawal", body = WithdrawalResponse),
        (status = 409, description = "Already resolved", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "resolveWithdrawal"
)]
#[post("/admin/withdrawals/{withdrawal_id}/resolve")]
pub async fn resolve_withdrawal(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
    path: web::Path<WithdrawalPath>,
    body: web::Json<ResolveWithdrawalBody>,
) -> ApiResult<web::Json<WithdrawalResponse>> {
    let id = parse_uuid(&path.withdrawal_id, "withdrawalId").map(WithdrawalId::from_uuid)?;
    let body = body.into_inner();
    let verdict = match body.verdict.as_str() {
        "approve" => WithdrawalVerdict::Approve,
        "reject" => WithdrawalVerdict::Reject,
        other => {
            return Err(DomainError::invalid_request(format!(
                "unknown verdict: {other}"
            )));
        }
    };
    let withdrawal = state
        .wallet
        .resolve_withdrawal(ResolveWithdrawalRequest {
            withdrawal_id: id,
            verdict,
            notes: body.notes,
        })
        .await?;
    Ok(web::Json(withdrawal.into()))
}

/// Grant experience points to a user.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{telegram_id}/experience",
    request_body = GrantExperienceBody,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 404, description = "Unknown user", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "grantExperience"
)]
#[post("/admin/users/{telegram_id}/experience")]
pub async fn grant_experience(
    _auth: AdminAuth,
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    body: web::Json<GrantExperienceBody>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user = TelegramId::new(&path.telegram_id)
        .map_err(|error| DomainError::invalid_request(format!("telegramId: {error}")))?;
    let profile = state.users.grant_experience(&user, body.xp).await?;
    Ok(web::Json(profile.into()))
}

/// Send a manual test message through the bot.
#[utoipa::path(
    post,
    path = "/api/v1/admin/telegram/message",
    request_body = TelegramMessageBody,
    responses(
        (status = 204, description = "Message sent"),
        (status = 503, description = "Bot token not configured", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "sendTelegramMessage"
)]
#[post("/admin/telegram/message")]
pub async fn send_telegram_message(
    _auth: AdminAuth,
    relay: web::Data<TelegramRelay>,
    body: web::Json<TelegramMessageBody>,
) -> ApiResult<HttpResponse> {
    let client = relay.client()?;
    client
        .send_message(&body.chat_id, &body.text)
        .await
        .map_err(|error| DomainError::service_unavailable(error.to_string()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the bot's command menu.
#[utoipa::path(
    put,
    path = "/api/v1/admin/telegram/commands",
    request_body = BotCommandsBody,
    responses(
        (status = 204, description = "Menu replaced"),
        (status = 503, description = "Bot token not configured", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "setTelegramCommands"
)]
#[put("/admin/telegram/commands")]
pub async fn set_telegram_commands(
    _auth: AdminAuth,
    relay: web::Data<TelegramRelay>,
    body: web::Json<BotCommandsBody>,
) -> ApiResult<HttpResponse> {
    let client = relay.client()?;
    let commands: Vec<BotCommand> = body
        .into_inner()
        .commands
        .into_iter()
        .map(|command| BotCommand {
            command: command.command,
            description: command.description,
        })
        .collect();
    client
        .set_my_commands(&commands)
        .await
        .map_err(|error| DomainError::service_unavailable(error.to_string()))?;
    Ok(HttpResponse::NoContent().finish())
}
