//! Port abstraction for task template reads.
//!
//! Templates are written only by the admin collaborator; the user workflow
//! needs just the active list and point lookups.

use async_trait::async_trait;

use crate::domain::task::{TaskId, TaskTemplate};

use super::StoreError;

/// Read-only port over the task template table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskTemplateRepository: Send + Sync {
    /// All active templates, in admin-defined order.
    async fn list_active(&self) -> Result<Vec<TaskTemplate>, StoreError>;

    /// Fetch one template by id, active or not.
    async fn find(&self, id: &TaskId) -> Result<Option<TaskTemplate>, StoreError>;
}
