//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Notifications, Referrals, SpecialTasks, TaskWorkflow, UserDirectory, Wallet,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Task board, eligibility, and completion.
    pub tasks: Arc<dyn TaskWorkflow>,
    /// UID submission and verification.
    pub special_tasks: Arc<dyn SpecialTasks>,
    /// Session hydration and profiles.
    pub users: Arc<dyn UserDirectory>,
    /// Referral recording and summaries.
    pub referrals: Arc<dyn Referrals>,
    /// Withdrawals.
    pub wallet: Arc<dyn Wallet>,
    /// Notification reads and maintenance.
    pub notifications: Arc<dyn Notifications>,
}
