//! OpenAPI documentation assembled from handler annotations.

use utoipa::OpenApi;

use crate::domain::{DomainError, ErrorCode, ReferralLevel, ReferralSummary};
use crate::inbound::http::admin::{
    BotCommandBody, BotCommandsBody, GrantExperienceBody, ResolveSubmissionBody,
    ResolveWithdrawalBody, TelegramMessageBody,
};
use crate::inbound::http::notifications::{NotificationResponse, UnreadCountResponse};
use crate::inbound::http::referrals::{ReferralBody, ReferralResponse};
use crate::inbound::http::tasks::{
    CompletedTaskResponse, EligibilityResponse, SubmissionResponse, TaskBoardResponse,
    TaskCardResponse, UidBody, UidCheckResponse,
};
use crate::inbound::http::users::{
    ProfileResponse, ProfileUpdateRequest, SessionRequest, StatsResponse,
};
use crate::inbound::http::wallet::{
    WithdrawBody, WithdrawalReceiptResponse, WithdrawalResponse, WithdrawalViewResponse,
};

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::tasks::task_board,
        crate::inbound::http::tasks::task_eligibility,
        crate::inbound::http::tasks::complete_task,
        crate::inbound::http::tasks::check_uid,
        crate::inbound::http::tasks::submit_uid,
        crate::inbound::http::tasks::list_submissions,
        crate::inbound::http::tasks::submission_status,
        crate::inbound::http::users::open_session,
        crate::inbound::http::users::my_profile,
        crate::inbound::http::users::update_my_profile,
        crate::inbound::http::users::my_stats,
        crate::inbound::http::wallet::request_withdrawal,
        crate::inbound::http::wallet::withdrawal_history,
        crate::inbound::http::referrals::record_referral,
        crate::inbound::http::referrals::referral_summary,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::admin::resolve_submission,
        crate::inbound::http::admin::resolve_withdrawal,
        crate::inbound::http::admin::grant_experience,
        crate::inbound::http::admin::send_telegram_message,
        crate::inbound::http::admin::set_telegram_commands,
    ),
    components(schemas(
        DomainError,
        ErrorCode,
        ReferralLevel,
        ReferralSummary,
        TaskBoardResponse,
        TaskCardResponse,
        EligibilityResponse,
        CompletedTaskResponse,
        UidBody,
        UidCheckResponse,
        SubmissionResponse,
        SessionRequest,
        ProfileUpdateRequest,
        ProfileResponse,
        StatsResponse,
        WithdrawBody,
        WithdrawalResponse,
        WithdrawalReceiptResponse,
        WithdrawalViewResponse,
        ReferralBody,
        ReferralResponse,
        NotificationResponse,
        UnreadCountResponse,
        ResolveSubmissionBody,
        ResolveWithdrawalBody,
        GrantExperienceBody,
        TelegramMessageBody,
        BotCommandBody,
        BotCommandsBody,
    )),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "tasks", description = "Task board, completion, and UID submissions"),
        (name = "users", description = "Session hydration and profiles"),
        (name = "wallet", description = "Withdrawals"),
        (name = "referrals", description = "Referral recording and summaries"),
        (name = "notifications", description = "Notification relay"),
        (name = "admin", description = "Admin console transitions"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_builds_and_lists_core_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/tasks"));
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/api/v1/tasks/{task_id}/complete")
        );
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/withdrawals"));
    }
}
