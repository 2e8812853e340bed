//! Builders wiring Diesel adapters into domain services and HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{
    NotificationsService, ReferralsService, SpecialTasksService, Taka, TaskWorkflowService,
    UserDirectoryService, WalletService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselCompletionRepository, DieselEarningsRepository, DieselNotificationRepository,
    DieselReferralRepository, DieselSubmissionRepository, DieselTaskTemplateRepository,
    DieselUserRepository, DieselWithdrawalRepository,
};

/// Build the HTTP state with database-backed services.
pub fn build_http_state(pool: &DbPool, referral_bonus: Taka) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let templates = Arc::new(DieselTaskTemplateRepository::new(pool.clone()));
    let completions = Arc::new(DieselCompletionRepository::new(pool.clone()));
    let submissions = Arc::new(DieselSubmissionRepository::new(pool.clone()));
    let referrals = Arc::new(DieselReferralRepository::new(pool.clone()));
    let earnings = Arc::new(DieselEarningsRepository::new(pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(pool.clone()));
    let clock = Arc::new(DefaultClock);

    HttpState {
        tasks: Arc::new(TaskWorkflowService::new(
            templates.clone(),
            completions.clone(),
            users.clone(),
            earnings.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        special_tasks: Arc::new(SpecialTasksService::new(
            submissions,
            templates,
            users.clone(),
            earnings.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        users: Arc::new(UserDirectoryService::new(
            users.clone(),
            referrals.clone(),
            completions,
            earnings.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        referrals: Arc::new(ReferralsService::new(
            referrals,
            users.clone(),
            earnings.clone(),
            notifications.clone(),
            clock.clone(),
            referral_bonus,
        )),
        wallet: Arc::new(WalletService::new(
            Arc::new(DieselWithdrawalRepository::new(pool.clone())),
            users,
            earnings,
            notifications.clone(),
            clock,
        )),
        notifications: Arc::new(NotificationsService::new(notifications)),
    }
}
