//! PostgreSQL-backed `TaskTemplateRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreError, TaskTemplateRepository};
use crate::domain::task::{TaskId, TaskTemplate};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::TaskTemplateRow;
use super::pool::DbPool;
use super::schema::task_templates;

/// Cap on templates returned to the board, matching the client's query.
const ACTIVE_LIMIT: i64 = 50;

/// Diesel adapter for the task template port.
#[derive(Clone)]
pub struct DieselTaskTemplateRepository {
    pool: DbPool,
}

impl DieselTaskTemplateRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskTemplateRepository for DieselTaskTemplateRepository {
    async fn list_active(&self) -> Result<Vec<TaskTemplate>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskTemplateRow> = task_templates::table
            .filter(task_templates::is_active.eq(true))
            .order(task_templates::created_at.asc())
            .limit(ACTIVE_LIMIT)
            .select(TaskTemplateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(TaskTemplateRow::into_domain).collect()
    }

    async fn find(&self, id: &TaskId) -> Result<Option<TaskTemplate>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TaskTemplateRow> = task_templates::table
            .filter(task_templates::id.eq(id.as_uuid()))
            .select(TaskTemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(TaskTemplateRow::into_domain).transpose()
    }
}
