//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories) abstract the persistent store; driving ports
//! (workflows) are what inbound adapters call. All driven ports share the
//! [`StoreError`] taxonomy because every adapter fails the same three ways:
//! it cannot reach the store, a statement fails, or an insert loses a
//! uniqueness race.

mod completion_repository;
mod earnings_repository;
mod notification_repository;
mod notifications;
mod referral_repository;
mod referrals;
mod special_tasks;
mod submission_repository;
mod task_template_repository;
mod task_workflow;
mod user_directory;
mod user_repository;
mod wallet;
mod withdrawal_repository;

#[cfg(test)]
pub use completion_repository::MockCompletionRepository;
pub use completion_repository::CompletionRepository;
#[cfg(test)]
pub use earnings_repository::MockEarningsRepository;
pub use earnings_repository::{EarningSource, EarningsRepository, NewEarning};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::NotificationRepository;
#[cfg(test)]
pub use notifications::MockNotifications;
pub use notifications::Notifications;
#[cfg(test)]
pub use referral_repository::MockReferralRepository;
pub use referral_repository::ReferralRepository;
#[cfg(test)]
pub use referrals::MockReferrals;
pub use referrals::{RecordReferralRequest, Referrals};
#[cfg(test)]
pub use special_tasks::MockSpecialTasks;
pub use special_tasks::{
    ResolveSubmissionRequest, SpecialTasks, SubmissionVerdict, SubmitUidRequest,
};
#[cfg(test)]
pub use submission_repository::MockSubmissionRepository;
pub use submission_repository::SubmissionRepository;
#[cfg(test)]
pub use task_template_repository::MockTaskTemplateRepository;
pub use task_template_repository::TaskTemplateRepository;
#[cfg(test)]
pub use task_workflow::MockTaskWorkflow;
pub use task_workflow::{
    CompleteTaskRequest, CompletedTask, TaskBoard, TaskBoardEntry, TaskWorkflow,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use wallet::MockWallet;
pub use wallet::{
    ResolveWithdrawalRequest, Wallet, WithdrawalReceipt, WithdrawalRequestForm, WithdrawalVerdict,
    WithdrawalView,
};
#[cfg(test)]
pub use withdrawal_repository::MockWithdrawalRepository;
pub use withdrawal_repository::WithdrawalRepository;

use super::error::DomainError;

/// Errors raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or a connection checkout failed.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-supplied context.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-supplied context.
        message: String,
    },
    /// An insert violated a uniqueness constraint (lost a race or repeated
    /// a key).
    #[error("duplicate row: {message}")]
    Duplicate {
        /// Adapter-supplied context.
        message: String,
    },
}

impl StoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-row error with the given message.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }
}

/// Map a store failure into a domain error, naming the collaborator that
/// failed. Duplicates are mapped here as conflicts; services that recover
/// from lost races match on [`StoreError::Duplicate`] before calling this.
pub(crate) fn map_store_error(context: &str, error: StoreError) -> DomainError {
    match error {
        StoreError::Connection { message } => {
            DomainError::service_unavailable(format!("{context} unavailable: {message}"))
        }
        StoreError::Query { message } => {
            DomainError::internal(format!("{context} error: {message}"))
        }
        StoreError::Duplicate { message } => {
            DomainError::conflict(format!("{context} conflict: {message}"))
        }
    }
}
