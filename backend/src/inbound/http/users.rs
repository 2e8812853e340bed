//! User session and profile HTTP handlers.
//!
//! ```text
//! POST  /api/v1/session
//! GET   /api/v1/me
//! PATCH /api/v1/me
//! GET   /api/v1/me/stats
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DomainError, ProfileChanges, TelegramId, UserIdentity, UserProfile, UserStats,
};
use crate::inbound::http::auth::TelegramAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Identity fields sent with the first load of a session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    /// Referrer's Telegram id from the start parameter, when present.
    pub referred_by: Option<String>,
}

/// Profile fields a user may change.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
}

/// A user profile as stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub telegram_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Spendable balance in whole taka.
    pub balance: i64,
    pub total_earnings: i64,
    pub total_referrals: i64,
    pub level: i32,
    pub experience_points: i64,
    pub mining_power: i64,
    pub energy: i32,
    pub max_energy: i32,
    pub claim_streak: i32,
    pub referral_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    pub is_verified: bool,
    pub is_banned: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            telegram_id: profile.telegram_id.to_string(),
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            photo_url: profile.photo_url,
            balance: profile.balance.amount(),
            total_earnings: profile.total_earnings.amount(),
            total_referrals: profile.total_referrals,
            level: profile.level,
            experience_points: profile.experience_points,
            mining_power: profile.mining_power,
            energy: profile.energy,
            max_energy: profile.max_energy,
            claim_streak: profile.claim_streak,
            referral_code: profile.referral_code,
            referred_by: profile.referred_by.map(String::from),
            is_verified: profile.is_verified,
            is_banned: profile.is_banned,
        }
    }
}

/// Aggregated user stats.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_referrals: u64,
    pub today_referrals: u64,
    pub week_referrals: u64,
    pub month_referrals: u64,
    pub tasks_completed: u64,
    pub total_earnings: i64,
    pub today_earnings: i64,
    pub week_earnings: i64,
    pub month_earnings: i64,
}

impl From<UserStats> for StatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            total_referrals: stats.total_referrals,
            today_referrals: stats.today_referrals,
            week_referrals: stats.week_referrals,
            month_referrals: stats.month_referrals,
            tasks_completed: stats.tasks_completed,
            total_earnings: stats.total_earnings.amount(),
            today_earnings: stats.today_earnings.amount(),
            week_earnings: stats.week_earnings.amount(),
            month_earnings: stats.month_earnings.amount(),
        }
    }
}

fn parse_referred_by(raw: Option<String>) -> Result<Option<TelegramId>, DomainError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| {
            TelegramId::new(value.trim())
                .map_err(|error| DomainError::invalid_request(format!("referredBy: {error}")))
        })
        .transpose()
}

/// Hydrate the session: load the caller's profile, creating it on first
/// load.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "openSession"
)]
#[post("/session")]
pub async fn open_session(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    body: web::Json<SessionRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let body = body.into_inner();
    let identity = UserIdentity {
        telegram_id: auth.user().clone(),
        username: body.username,
        first_name: body.first_name,
        last_name: body.last_name,
        photo_url: body.photo_url,
        referred_by: parse_referred_by(body.referred_by)?,
    };
    let profile = state.users.load_or_create(identity).await?;
    Ok(web::Json(profile.into()))
}

/// Fetch the caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "No account yet", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "myProfile"
)]
#[get("/me")]
pub async fn my_profile(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.users.profile(auth.user()).await?;
    Ok(web::Json(profile.into()))
}

/// Update the caller's profile fields.
#[utoipa::path(
    patch,
    path = "/api/v1/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 404, description = "No account yet", body = DomainError)
    ),
    tags = ["users"],
    operation_id = "updateMyProfile"
)]
#[patch("/me")]
pub async fn update_my_profile(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
    body: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let body = body.into_inner();
    let profile = state
        .users
        .update_profile(
            auth.user(),
            ProfileChanges {
                username: body.username,
                first_name: body.first_name,
                last_name: body.last_name,
                photo_url: body.photo_url,
            },
        )
        .await?;
    Ok(web::Json(profile.into()))
}

/// Aggregate the caller's referral, task, and earnings stats.
#[utoipa::path(
    get,
    path = "/api/v1/me/stats",
    responses(
        (status = 200, description = "Stats", body = StatsResponse)
    ),
    tags = ["users"],
    operation_id = "myStats"
)]
#[get("/me/stats")]
pub async fn my_stats(
    auth: TelegramAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<StatsResponse>> {
    let stats = state.users.stats(auth.user()).await?;
    Ok(web::Json(stats.into()))
}
