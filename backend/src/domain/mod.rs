//! Domain entities, derivation logic, ports, and services.
//!
//! Types here are transport and storage agnostic. Inbound adapters map them
//! to HTTP DTOs; outbound adapters map them to rows. Services implement the
//! driving ports in `ports` against the driven (repository) ports, so every
//! workflow is testable with mocks and a mocked clock.

pub mod completion;
pub mod error;
pub mod identity;
pub mod money;
pub mod notification;
pub mod ports;
pub mod referral;
pub mod schedule;
pub mod submission;
pub mod task;
pub mod user;
pub mod withdrawal;

mod notifications_service;
mod referrals_service;
mod special_tasks_service;
mod tasks_service;
mod users_service;
mod wallet_service;

pub use self::completion::{
    CompletionId, IneligibilityReason, NewCompletion, TaskCompletion, TaskEligibility,
};
pub use self::error::{DomainError, ErrorCode};
pub use self::identity::{TelegramId, TelegramIdValidationError};
pub use self::money::Taka;
pub use self::notification::{
    NewNotification, Notification, NotificationId, NotificationKind,
};
pub use self::notifications_service::NotificationsService;
pub use self::referral::{NewReferral, Referral, ReferralLevel, ReferralSummary, REFERRAL_LEVELS};
pub use self::referrals_service::ReferralsService;
pub use self::special_tasks_service::SpecialTasksService;
pub use self::submission::{
    NewSubmission, SpecialTaskSubmission, SubmissionId, SubmissionStatus, SubmittedUid,
    UidCheck, UidValidationError,
};
pub use self::task::{TaskId, TaskTemplate, TaskType};
pub use self::tasks_service::TaskWorkflowService;
pub use self::user::{
    level_for_xp, NewUserRecord, ProfileChanges, UserIdentity, UserProfile, UserStats,
};
pub use self::users_service::UserDirectoryService;
pub use self::wallet_service::WalletService;
pub use self::withdrawal::{
    NewWithdrawal, RejectionOutcome, WithdrawalId, WithdrawalMethod, WithdrawalRequest,
    WithdrawalStatus,
};
