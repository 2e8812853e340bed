//! Referral HTTP handlers.
//!
//! ```text
//! POST /api/v1/referrals
//! GET  /api/v1/referrals/summary
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RecordReferralRequest;
use crate::domain::{DomainError, Referral, ReferralSummary, TelegramId};
use crate::inbound::http::auth::TelegramAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for recording that the caller joined through a referral link.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralBody {
    /// The referrer's Telegram id from the start parameter.
    pub referrer_id: String,
}

/// A recorded referral.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub id: String,
    pub referrer_id: String,
    pub referred_id: String,
    /// Bonus credited to each side, in whole taka.
    pub reward: i64,
    pub created_at: String,
}

impl From<Referral> for ReferralResponse {
    fn from(referral: Referral) -> Self {
        Self {
            id: referral.id.to_string(),
            referrer_id: referral.referrer.to_string(),
            referred_id: referral.referred.to_string(),
            reward: referral.reward.amount(),
            created_at: referral.created_at.to_rfc3339(),
        }
    }
}

/// Record that the caller joined through `referrerId`'s link. Both sides
/// are credited the configured bonus.
#[utoipa::path(
    post,
    path = "/api/v1/referrals",
    request_body = ReferralBody,
    responses(
        (status = 200, description = "Referral recorded", body = ReferralResponse),
        (status = 404, description = "Caller has no account yet", body = DomainError),
        (status = 409, description = "Already referred", body = DomainError)
    ),
    tags = ["referrals"],
    operation_id = "recordReferral"
)]
#[post("/referrals")]
pub async fn record_referral(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    body: web::Json<ReferralBody>,
) -> ApiResult<web::Json<ReferralResponse>> {
    let referrer = TelegramId::new(body.referrer_id.trim())
        .map_err(|error| DomainError::invalid_request(format!("referrerId: {error}")))?;
    let referral = state
        .referrals
        .record_referral(RecordReferralRequest {
            referrer,
            referred: auth.user().clone(),
        })
        .await?;
    Ok(web::Json(referral.into()))
}

/// The caller's referral counts and ladder position.
#[utoipa::path(
    get,
    path = "/api/v1/referrals/summary",
    responses(
        (status = 200, description = "Summary", body = ReferralSummary)
    ),
    tags = ["referrals"],
    operation_id = "referralSummary"
)]
#[get("/referrals/summary")]
pub async fn referral_summary(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ReferralSummary>> {
    let summary = state.referrals.summary(auth.user()).await?;
    Ok(web::Json(summary))
}
