//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with bb8 pooling.
//!
//! Principles:
//!
//! - **Thin adapters**: repositories only translate between row structs and
//!   domain types; no business logic lives here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak to the domain.
//! - **Shared error mapping**: pool and Diesel failures map to the domain's
//!   `StoreError` in one place (`diesel_helpers.rs`); unique violations
//!   become duplicates so services can resolve lost races.

pub(crate) mod diesel_helpers;
mod diesel_completion_repository;
mod diesel_earnings_repository;
mod diesel_notification_repository;
mod diesel_referral_repository;
mod diesel_submission_repository;
mod diesel_task_template_repository;
mod diesel_user_repository;
mod diesel_withdrawal_repository;
mod models;
mod pool;
mod schema;

pub use diesel_completion_repository::DieselCompletionRepository;
pub use diesel_earnings_repository::DieselEarningsRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_referral_repository::DieselReferralRepository;
pub use diesel_submission_repository::DieselSubmissionRepository;
pub use diesel_task_template_repository::DieselTaskTemplateRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_withdrawal_repository::DieselWithdrawalRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
