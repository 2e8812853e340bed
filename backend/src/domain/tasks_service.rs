//! Task eligibility and completion workflow service.
//!
//! Implements the [`TaskWorkflow`] driving port. Eligibility is re-derived
//! from completion history on every call; the eligibility check and the
//! subsequent writes are separate store round-trips with no locking, and the
//! completion insert, balance update, and ledger append are applied in
//! sequence without a transaction. See DESIGN.md for the recorded
//! consequences of that shape.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::completion::{NewCompletion, TaskEligibility};
use crate::domain::error::DomainError;
use crate::domain::identity::TelegramId;
use crate::domain::notification::{notify_quietly, NewNotification, NotificationKind};
use crate::domain::ports::{
    map_store_error, CompleteTaskRequest, CompletedTask, CompletionRepository, EarningSource,
    EarningsRepository, NewEarning, NotificationRepository, StoreError, TaskBoard, TaskBoardEntry,
    TaskTemplateRepository, TaskWorkflow, UserRepository,
};
use crate::domain::schedule::{completed_today, current_streak, remaining_cooldown};
use crate::domain::task::{TaskId, TaskTemplate, TaskType};
use crate::domain::user::{NewUserRecord, UserProfile};

/// Days of history scanned for board state, check-in, and streaks.
const HISTORY_WINDOW_DAYS: i64 = 7;

/// Row cap when scanning completion history.
const HISTORY_LIMIT: i64 = 100;

/// Domain service implementing the task workflow driving port.
pub struct TaskWorkflowService<T, C, U, E, N> {
    templates: Arc<T>,
    completions: Arc<C>,
    users: Arc<U>,
    earnings: Arc<E>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<T, C, U, E, N> TaskWorkflowService<T, C, U, E, N> {
    /// Create a new service over the given repositories.
    pub fn new(
        templates: Arc<T>,
        completions: Arc<C>,
        users: Arc<U>,
        earnings: Arc<E>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            templates,
            completions,
            users,
            earnings,
            notifications,
            clock,
        }
    }
}

impl<T, C, U, E, N> TaskWorkflowService<T, C, U, E, N>
where
    T: TaskTemplateRepository,
    C: CompletionRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn template(&self, task: &TaskId) -> Result<TaskTemplate, DomainError> {
        self.templates
            .find(task)
            .await
            .map_err(|error| map_store_error("task store", error))?
            .ok_or_else(|| DomainError::not_found("task not found"))
    }

    async fn eligibility_for(
        &self,
        user: &TelegramId,
        template: &TaskTemplate,
        now: DateTime<Utc>,
    ) -> Result<TaskEligibility, DomainError> {
        if !template.is_active {
            return Ok(TaskEligibility::inactive());
        }
        if template.cooldown_secs <= 0 {
            return Ok(TaskEligibility::eligible());
        }

        let latest = self
            .completions
            .latest_for(user, &template.id)
            .await
            .map_err(|error| map_store_error("completion store", error))?;

        Ok(match latest {
            None => TaskEligibility::eligible(),
            Some(completion) => {
                let remaining =
                    remaining_cooldown(template.cooldown_secs, completion.completed_at, now);
                if remaining > 0 {
                    TaskEligibility::cooling_down(remaining)
                } else {
                    TaskEligibility::eligible()
                }
            }
        })
    }

    /// Load the user's row, bootstrapping one when this is the first time
    /// the user touches any workflow.
    async fn load_or_bootstrap(&self, user: &TelegramId) -> Result<UserProfile, DomainError> {
        if let Some(profile) = self
            .users
            .find(user)
            .await
            .map_err(|error| map_store_error("user store", error))?
        {
            return Ok(profile);
        }

        match self.users.insert(&NewUserRecord::bootstrap(user)).await {
            Ok(profile) => Ok(profile),
            // Lost a concurrent first-load race; the row exists now.
            Err(StoreError::Duplicate { .. }) => self
                .users
                .find(user)
                .await
                .map_err(|error| map_store_error("user store", error))?
                .ok_or_else(|| {
                    DomainError::internal("user row disappeared during create race")
                }),
            Err(error) => Err(map_store_error("user store", error)),
        }
    }
}

#[async_trait]
impl<T, C, U, E, N> TaskWorkflow for TaskWorkflowService<T, C, U, E, N>
where
    T: TaskTemplateRepository,
    C: CompletionRepository,
    U: UserRepository,
    E: EarningsRepository,
    N: NotificationRepository,
{
    async fn task_board(&self, user: &TelegramId) -> Result<TaskBoard, DomainError> {
        let templates = self
            .templates
            .list_active()
            .await
            .map_err(|error| map_store_error("task store", error))?;

        let now = self.clock.utc();
        let since = now - Duration::days(HISTORY_WINDOW_DAYS);
        let history = self
            .completions
            .history_since(user, since, HISTORY_LIMIT)
            .await
            .map_err(|error| map_store_error("completion store", error))?;

        let mut latest: HashMap<TaskId, DateTime<Utc>> = HashMap::new();
        for completion in &history {
            latest
                .entry(completion.task_id)
                .and_modify(|at| {
                    if completion.completed_at > *at {
                        *at = completion.completed_at;
                    }
                })
                .or_insert(completion.completed_at);
        }

        let tasks = templates
            .into_iter()
            .map(|template| {
                let (remaining, completed) = match latest.get(&template.id) {
                    None => (0, false),
                    Some(&completed_at) => {
                        if template.cooldown_secs > 0 {
                            let remaining =
                                remaining_cooldown(template.cooldown_secs, completed_at, now);
                            (remaining, remaining > 0)
                        } else {
                            (0, true)
                        }
                    }
                };
                TaskBoardEntry {
                    template,
                    remaining_cooldown_secs: remaining,
                    completed,
                }
            })
            .collect();

        let today = now.date_naive();
        let checkin_days: BTreeSet<_> = history
            .iter()
            .filter(|completion| completion.task_type == TaskType::Checkin)
            .map(|completion| completion.completed_at.date_naive())
            .collect();
        let completion_days: BTreeSet<_> = history
            .iter()
            .map(|completion| completion.completed_at.date_naive())
            .collect();

        Ok(TaskBoard {
            tasks,
            daily_checkin_done: completed_today(&checkin_days, today),
            streak_days: current_streak(&completion_days, today),
        })
    }

    async fn eligibility(
        &self,
        user: &TelegramId,
        task: &TaskId,
    ) -> Result<TaskEligibility, DomainError> {
        let template = self.template(task).await?;
        self.eligibility_for(user, &template, self.clock.utc()).await
    }

    async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> Result<CompletedTask, DomainError> {
        let template = self.template(&request.task_id).await?;
        if template.is_special() {
            return Err(DomainError::invalid_request(
                "special tasks are completed by UID submission",
            ));
        }

        let now = self.clock.utc();
        let eligibility = self
            .eligibility_for(&request.user, &template, now)
            .await?;
        if !eligibility.eligible {
            return Err(if eligibility.remaining_secs > 0 {
                DomainError::conflict("cooldown active")
                    .with_details(json!({ "remainingSecs": eligibility.remaining_secs }))
            } else {
                DomainError::conflict("task is not active")
            });
        }

        let profile = self.load_or_bootstrap(&request.user).await?;

        // First write: the completion fact. Failure here aborts with the
        // balance untouched.
        let completion = self
            .completions
            .insert(&NewCompletion {
                user: request.user.clone(),
                task_id: template.id,
                task_type: template.task_type,
                task_title: template.title.clone(),
                reward: template.reward,
                completed_at: now,
            })
            .await
            .map_err(|error| map_store_error("completion store", error))?;

        // Second write: credit the reward, read-modify-write. If this
        // fails the completion row stays without a credit.
        let new_balance = profile
            .balance
            .checked_add(template.reward)
            .ok_or_else(|| DomainError::internal("balance overflow"))?;
        let new_total = profile
            .total_earnings
            .checked_add(template.reward)
            .ok_or_else(|| DomainError::internal("total earnings overflow"))?;
        if let Err(error) = self
            .users
            .set_balances(&request.user, new_balance, new_total)
            .await
        {
            warn!(
                user = %request.user,
                completion = %completion.id.as_uuid(),
                %error,
                "completion recorded but reward was not credited"
            );
            return Err(map_store_error("user store", error));
        }

        // Ledger append is display-only; a failure must not undo the
        // credit above.
        if let Err(error) = self
            .earnings
            .insert(&NewEarning {
                user: request.user.clone(),
                amount: template.reward,
                source: EarningSource::Task,
                description: template.title.clone(),
            })
            .await
        {
            warn!(user = %request.user, %error, "failed to append earnings ledger entry");
        }

        info!(
            user = %request.user,
            task = %template.id,
            reward = template.reward.amount(),
            "task completed"
        );
        notify_quietly(
            self.notifications.as_ref(),
            NewNotification::plain(
                request.user.clone(),
                NotificationKind::Success,
                "Task Completed!",
                format!("Earned {}", template.reward),
            ),
        )
        .await;

        Ok(CompletedTask {
            completion,
            new_balance,
            cooldown_secs: template.cooldown_secs,
        })
    }
}

#[cfg(test)]
#[path = "tasks_service_tests.rs"]
mod tasks_service_tests;
