//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions validate stored tags and ids
//! so a corrupt row surfaces as a query error rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::completion::{CompletionId, TaskCompletion};
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::ports::StoreError;
use crate::domain::referral::Referral;
use crate::domain::submission::{
    SpecialTaskSubmission, SubmissionId, SubmittedUid,
};
use crate::domain::task::{TaskId, TaskTemplate};
use crate::domain::user::UserProfile;
use crate::domain::withdrawal::{WithdrawalId, WithdrawalRequest};

use super::schema::{
    earnings, notifications, referrals, special_task_submissions, task_completions,
    task_templates, users, withdrawal_requests,
};

fn corrupt(context: &str, error: impl std::fmt::Display) -> StoreError {
    StoreError::query(format!("corrupt {context} in row: {error}"))
}

fn parse_telegram_id(raw: String) -> Result<TelegramId, StoreError> {
    TelegramId::new(raw).map_err(|error| corrupt("telegram id", error))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    #[diesel(column_name = id)]
    pub _id: Uuid,
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub balance: i64,
    pub total_earnings: i64,
    pub total_referrals: i64,
    pub level: i32,
    pub experience_points: i64,
    pub mining_power: i64,
    pub energy: i32,
    pub max_energy: i32,
    pub claim_streak: i32,
    pub last_claim: Option<DateTime<Utc>>,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub is_verified: bool,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<UserProfile, StoreError> {
        Ok(UserProfile {
            telegram_id: parse_telegram_id(self.telegram_id)?,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            photo_url: self.photo_url,
            balance: Taka::new(self.balance),
            total_earnings: Taka::new(self.total_earnings),
            total_referrals: self.total_referrals,
            level: self.level,
            experience_points: self.experience_points,
            mining_power: self.mining_power,
            energy: self.energy,
            max_energy: self.max_energy,
            claim_streak: self.claim_streak,
            last_claim: self.last_claim,
            referral_code: self.referral_code,
            referred_by: self.referred_by.map(parse_telegram_id).transpose()?,
            is_verified: self.is_verified,
            is_banned: self.is_banned,
            ban_reason: self.ban_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating user rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub telegram_id: &'a str,
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub balance: i64,
    pub energy: i32,
    pub max_energy: i32,
    pub level: i32,
    pub referral_code: &'a str,
    pub referred_by: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Task templates
// ---------------------------------------------------------------------------

/// Row struct for reading from the task templates table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskTemplateRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub reward: i64,
    pub task_type: String,
    pub icon: String,
    pub button_text: String,
    pub cooldown_secs: i64,
    pub max_completions: i64,
    pub url: Option<String>,
    pub is_active: bool,
}

impl TaskTemplateRow {
    pub(crate) fn into_domain(self) -> Result<TaskTemplate, StoreError> {
        Ok(TaskTemplate {
            id: TaskId::from_uuid(self.id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            reward: Taka::new(self.reward),
            task_type: self
                .task_type
                .parse()
                .map_err(|error| corrupt("task type", error))?,
            icon: self.icon,
            button_text: self.button_text,
            cooldown_secs: self.cooldown_secs,
            max_completions: self.max_completions,
            url: self.url,
            is_active: self.is_active,
        })
    }
}

// ---------------------------------------------------------------------------
// Task completions
// ---------------------------------------------------------------------------

/// Row struct for reading from the completions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_completions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompletionRow {
    pub id: Uuid,
    pub user_id: String,
    pub task_id: Uuid,
    pub task_type: String,
    pub task_title: String,
    pub reward_amount: i64,
    pub completed_at: DateTime<Utc>,
}

impl CompletionRow {
    pub(crate) fn into_domain(self) -> Result<TaskCompletion, StoreError> {
        Ok(TaskCompletion {
            id: CompletionId::from_uuid(self.id),
            user: parse_telegram_id(self.user_id)?,
            task_id: TaskId::from_uuid(self.task_id),
            task_type: self
                .task_type
                .parse()
                .map_err(|error| corrupt("task type", error))?,
            task_title: self.task_title,
            reward: Taka::new(self.reward_amount),
            completed_at: self.completed_at,
        })
    }
}

/// Insertable struct for recording completions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_completions)]
pub(crate) struct NewCompletionRow<'a> {
    pub user_id: &'a str,
    pub task_id: Uuid,
    pub task_type: &'a str,
    pub task_title: &'a str,
    pub reward_amount: i64,
    pub completed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Special task submissions
// ---------------------------------------------------------------------------

/// Row struct for reading from the submissions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = special_task_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubmissionRow {
    pub id: Uuid,
    pub user_id: String,
    pub task_id: Uuid,
    pub task_type: String,
    pub uid_submitted: String,
    pub status: String,
    pub reward_amount: i64,
    pub admin_notes: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRow {
    pub(crate) fn into_domain(self) -> Result<SpecialTaskSubmission, StoreError> {
        Ok(SpecialTaskSubmission {
            id: SubmissionId::from_uuid(self.id),
            user: parse_telegram_id(self.user_id)?,
            task_id: TaskId::from_uuid(self.task_id),
            task_type: self
                .task_type
                .parse()
                .map_err(|error| corrupt("task type", error))?,
            uid: SubmittedUid::new(&self.uid_submitted)
                .map_err(|error| corrupt("submitted uid", error))?,
            status: self
                .status
                .parse()
                .map_err(|error| corrupt("submission status", error))?,
            reward: Taka::new(self.reward_amount),
            admin_notes: self.admin_notes,
            verified_at: self.verified_at,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for recording submissions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = special_task_submissions)]
pub(crate) struct NewSubmissionRow<'a> {
    pub user_id: &'a str,
    pub task_id: Uuid,
    pub task_type: &'a str,
    pub uid_submitted: &'a str,
    pub status: &'a str,
    pub reward_amount: i64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

/// Row struct for reading from the referrals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = referrals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReferralRow {
    pub id: Uuid,
    pub referrer_id: String,
    pub referred_id: String,
    pub reward_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl ReferralRow {
    pub(crate) fn into_domain(self) -> Result<Referral, StoreError> {
        Ok(Referral {
            id: self.id,
            referrer: parse_telegram_id(self.referrer_id)?,
            referred: parse_telegram_id(self.referred_id)?,
            reward: Taka::new(self.reward_amount),
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for recording referrals.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = referrals)]
pub(crate) struct NewReferralRow<'a> {
    pub referrer_id: &'a str,
    pub referred_id: &'a str,
    pub reward_amount: i64,
}

// ---------------------------------------------------------------------------
// Earnings
// ---------------------------------------------------------------------------

/// Insertable struct for appending ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = earnings)]
pub(crate) struct NewEarningRow<'a> {
    pub user_id: &'a str,
    pub amount: i64,
    pub source: &'a str,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Withdrawal requests
// ---------------------------------------------------------------------------

/// Row struct for reading from the withdrawal requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = withdrawal_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WithdrawalRow {
    pub id: Uuid,
    pub user_id: String,
    pub amount: i64,
    pub method: String,
    pub account_number: String,
    pub account_name: String,
    pub bank_name: Option<String>,
    pub crypto_symbol: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WithdrawalRow {
    pub(crate) fn into_domain(self) -> Result<WithdrawalRequest, StoreError> {
        Ok(WithdrawalRequest {
            id: WithdrawalId::from_uuid(self.id),
            user: parse_telegram_id(self.user_id)?,
            amount: Taka::new(self.amount),
            method: self
                .method
                .parse()
                .map_err(|error| corrupt("withdrawal method", error))?,
            account_number: self.account_number,
            account_name: self.account_name,
            bank_name: self.bank_name,
            crypto_symbol: self.crypto_symbol,
            status: self
                .status
                .parse()
                .map_err(|error| corrupt("withdrawal status", error))?,
            admin_notes: self.admin_notes,
            processed_at: self.processed_at,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for recording withdrawal requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = withdrawal_requests)]
pub(crate) struct NewWithdrawalRow<'a> {
    pub user_id: &'a str,
    pub amount: i64,
    pub method: &'a str,
    pub account_number: &'a str,
    pub account_name: &'a str,
    pub bank_name: Option<&'a str>,
    pub crypto_symbol: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub action_url: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl NotificationRow {
    pub(crate) fn into_domain(self) -> Result<Notification, StoreError> {
        Ok(Notification {
            id: NotificationId::from_uuid(self.id),
            user: parse_telegram_id(self.user_id)?,
            kind: self
                .kind
                .parse()
                .map_err(|error| corrupt("notification kind", error))?,
            title: self.title,
            message: self.message,
            is_read: self.is_read,
            action_url: self.action_url,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub user_id: &'a str,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub action_url: Option<&'a str>,
    pub metadata: &'a serde_json::Value,
}
