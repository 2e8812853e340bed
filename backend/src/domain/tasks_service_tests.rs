//! Tests for the task workflow service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use super::TaskWorkflowService;
use crate::domain::completion::{CompletionId, TaskCompletion};
use crate::domain::error::ErrorCode;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{
    CompleteTaskRequest, MockCompletionRepository, MockEarningsRepository,
    MockNotificationRepository, MockTaskTemplateRepository, MockUserRepository, StoreError,
    TaskWorkflow,
};
use crate::domain::task::{TaskId, TaskTemplate, TaskType};
use crate::domain::user::UserProfile;

type Service = TaskWorkflowService<
    MockTaskTemplateRepository,
    MockCompletionRepository,
    MockUserRepository,
    MockEarningsRepository,
    MockNotificationRepository,
>;

struct Mocks {
    templates: MockTaskTemplateRepository,
    completions: MockCompletionRepository,
    users: MockUserRepository,
    earnings: MockEarningsRepository,
    notifications: MockNotificationRepository,
    clock: MockClock,
}

impl Mocks {
    fn new(now: DateTime<Utc>) -> Self {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        Self {
            templates: MockTaskTemplateRepository::new(),
            completions: MockCompletionRepository::new(),
            users: MockUserRepository::new(),
            earnings: MockEarningsRepository::new(),
            notifications: MockNotificationRepository::new(),
            clock,
        }
    }

    fn into_service(self) -> Service {
        TaskWorkflowService::new(
            Arc::new(self.templates),
            Arc::new(self.completions),
            Arc::new(self.users),
            Arc::new(self.earnings),
            Arc::new(self.notifications),
            Arc::new(self.clock),
        )
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid instant")
}

fn user() -> TelegramId {
    TelegramId::new("123456789").expect("valid id")
}

fn checkin_template(id: TaskId) -> TaskTemplate {
    TaskTemplate {
        id,
        title: "Daily Check-in".to_owned(),
        subtitle: "Complete daily check-in to earn rewards".to_owned(),
        description: String::new(),
        reward: Taka::new(50),
        task_type: TaskType::Checkin,
        icon: "checkin".to_owned(),
        button_text: "CHECK IN".to_owned(),
        cooldown_secs: 86_400,
        max_completions: 1,
        url: None,
        is_active: true,
    }
}

fn social_template(id: TaskId) -> TaskTemplate {
    TaskTemplate {
        id,
        title: "Join Telegram Channel".to_owned(),
        subtitle: "Join our official channel".to_owned(),
        description: String::new(),
        reward: Taka::new(5),
        task_type: TaskType::Social,
        icon: "social".to_owned(),
        button_text: "JOIN CHANNEL".to_owned(),
        cooldown_secs: 0,
        max_completions: 1,
        url: Some("https://t.me/example_channel".to_owned()),
        is_active: true,
    }
}

fn completion_at(task: TaskId, completed_at: DateTime<Utc>) -> TaskCompletion {
    TaskCompletion {
        id: CompletionId::random(),
        user: user(),
        task_id: task,
        task_type: TaskType::Checkin,
        task_title: "Daily Check-in".to_owned(),
        reward: Taka::new(50),
        completed_at,
    }
}

fn profile_with_balance(balance: Taka) -> UserProfile {
    let now = at(2025, 6, 1, 0, 0, 0);
    UserProfile {
        telegram_id: user(),
        username: Some("cashfan".to_owned()),
        first_name: None,
        last_name: None,
        photo_url: None,
        balance,
        total_earnings: balance,
        total_referrals: 0,
        level: 1,
        experience_points: 0,
        mining_power: 0,
        energy: 100,
        max_energy: 100,
        claim_streak: 0,
        last_claim: None,
        referral_code: "BT456789".to_owned(),
        referred_by: None,
        is_verified: false,
        is_banned: false,
        ban_reason: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn completing_a_task_credits_the_reward_once() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();
    let template = checkin_template(task);

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks
        .completions
        .expect_latest_for()
        .return_once(|_, _| Ok(None));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(100)))));
    mocks
        .completions
        .expect_insert()
        .times(1)
        .returning(move |new| {
            Ok(TaskCompletion {
                id: CompletionId::random(),
                user: new.user.clone(),
                task_id: new.task_id,
                task_type: new.task_type,
                task_title: new.task_title.clone(),
                reward: new.reward,
                completed_at: new.completed_at,
            })
        });
    mocks
        .users
        .expect_set_balances()
        .withf(|_, balance, total| *balance == Taka::new(150) && *total == Taka::new(150))
        .times(1)
        .return_once(|_, _, _| Ok(()));
    mocks.earnings.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .times(1)
        .returning(|_| Err(StoreError::query("notification sink closed")));

    let service = mocks.into_service();
    let completed = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect("completion succeeds");

    assert_eq!(completed.new_balance, Taka::new(150));
    assert_eq!(completed.cooldown_secs, 86_400);
    assert_eq!(completed.completion.reward, Taka::new(50));
}

#[tokio::test]
async fn retry_inside_the_cooldown_is_rejected_without_a_new_row() {
    // Completed one second ago; a 24h cooldown leaves 86 399 seconds.
    let now = at(2025, 6, 10, 12, 0, 1);
    let task = TaskId::random();
    let template = checkin_template(task);

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks
        .completions
        .expect_latest_for()
        .return_once(move |_, _| Ok(Some(completion_at(task, at(2025, 6, 10, 12, 0, 0)))));
    mocks.completions.expect_insert().times(0);
    mocks.users.expect_set_balances().times(0);

    let service = mocks.into_service();
    let error = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect_err("cooldown rejects");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let details = error.details().expect("remaining seconds reported");
    assert_eq!(details["remainingSecs"], 86_399);
}

#[tokio::test]
async fn zero_cooldown_tasks_repeat_back_to_back() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();

    let mut mocks = Mocks::new(now);
    let template = social_template(task);
    mocks
        .templates
        .expect_find()
        .times(2)
        .returning(move |_| Ok(Some(template.clone())));
    // No cooldown means the history is never consulted for eligibility.
    mocks.completions.expect_latest_for().times(0);
    mocks
        .users
        .expect_find()
        .times(2)
        .returning(|_| Ok(Some(profile_with_balance(Taka::new(0)))));
    mocks
        .completions
        .expect_insert()
        .times(2)
        .returning(move |new| {
            Ok(TaskCompletion {
                id: CompletionId::random(),
                user: new.user.clone(),
                task_id: new.task_id,
                task_type: new.task_type,
                task_title: new.task_title.clone(),
                reward: new.reward,
                completed_at: new.completed_at,
            })
        });
    mocks
        .users
        .expect_set_balances()
        .times(2)
        .returning(|_, _, _| Ok(()));
    mocks.earnings.expect_insert().times(2).returning(|_| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .times(2)
        .returning(|n| {
            Ok(crate::domain::notification::Notification {
                id: crate::domain::notification::NotificationId::random(),
                user: n.user.clone(),
                kind: n.kind,
                title: n.title.clone(),
                message: n.message.clone(),
                is_read: false,
                action_url: None,
                metadata: serde_json::Value::Null,
                created_at: at(2025, 6, 10, 12, 0, 0),
            })
        });

    let service = mocks.into_service();
    for _ in 0..2 {
        service
            .complete_task(CompleteTaskRequest {
                user: user(),
                task_id: task,
            })
            .await
            .expect("repeatable completion");
    }
}

#[tokio::test]
async fn special_tasks_are_routed_to_uid_submission() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();
    let mut template = social_template(task);
    template.task_type = TaskType::TradingPlatform;

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks.completions.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect_err("special task rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn inactive_tasks_cannot_be_completed() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();
    let mut template = checkin_template(task);
    template.is_active = false;

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks.completions.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect_err("inactive task rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert!(error.details().is_none());
}

#[tokio::test]
async fn failed_completion_insert_leaves_the_balance_untouched() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();
    let template = checkin_template(task);

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks
        .completions
        .expect_latest_for()
        .return_once(|_, _| Ok(None));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(100)))));
    mocks
        .completions
        .expect_insert()
        .return_once(|_| Err(StoreError::query("insert failed")));
    mocks.users.expect_set_balances().times(0);

    let service = mocks.into_service();
    let error = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect_err("insert failure aborts");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn failed_credit_surfaces_after_the_completion_was_recorded() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let task = TaskId::random();
    let template = checkin_template(task);

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_find()
        .return_once(move |_| Ok(Some(template)));
    mocks
        .completions
        .expect_latest_for()
        .return_once(|_, _| Ok(None));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(100)))));
    mocks
        .completions
        .expect_insert()
        .times(1)
        .returning(move |new| {
            Ok(TaskCompletion {
                id: CompletionId::random(),
                user: new.user.clone(),
                task_id: new.task_id,
                task_type: new.task_type,
                task_title: new.task_title.clone(),
                reward: new.reward,
                completed_at: new.completed_at,
            })
        });
    mocks
        .users
        .expect_set_balances()
        .return_once(|_, _, _| Err(StoreError::connection("lost connection")));
    // The ledger and notification never run once the credit fails.
    mocks.earnings.expect_insert().times(0);
    mocks.notifications.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .complete_task(CompleteTaskRequest {
            user: user(),
            task_id: task,
        })
        .await
        .expect_err("credit failure surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn board_reports_cooldowns_checkin_and_streak() {
    // Three consecutive days of check-ins ending today, the last one an
    // hour ago, leaves 23h of cooldown on the check-in task.
    let now = at(2025, 6, 10, 13, 0, 0);
    let task = TaskId::random();
    let template = checkin_template(task);

    let mut mocks = Mocks::new(now);
    mocks
        .templates
        .expect_list_active()
        .return_once(move || Ok(vec![template]));
    mocks
        .completions
        .expect_history_since()
        .return_once(move |_, _, _| {
            Ok(vec![
                completion_at(task, at(2025, 6, 10, 12, 0, 0)),
                completion_at(task, at(2025, 6, 9, 11, 0, 0)),
                completion_at(task, at(2025, 6, 8, 10, 0, 0)),
            ])
        });

    let service = mocks.into_service();
    let board = service.task_board(&user()).await.expect("board loads");

    assert!(board.daily_checkin_done);
    assert_eq!(board.streak_days, 3);
    let entry = board.tasks.first().expect("one task");
    assert!(entry.completed);
    assert_eq!(entry.remaining_cooldown_secs, 86_400 - 3_600);
}

#[tokio::test]
async fn board_streak_dies_after_a_gap_even_with_todays_completion() {
    // Runs on days 1-3, a gap on day 4, and a completion today (day 5):
    // the old run never resumes, today restarts at one.
    let now = at(2025, 6, 5, 20, 0, 0);
    let task = TaskId::random();

    let mut mocks = Mocks::new(now);
    mocks.templates.expect_list_active().return_once(|| Ok(vec![]));
    mocks
        .completions
        .expect_history_since()
        .return_once(move |_, _, _| {
            Ok(vec![
                completion_at(task, at(2025, 6, 5, 9, 0, 0)),
                completion_at(task, at(2025, 6, 3, 9, 0, 0)),
                completion_at(task, at(2025, 6, 2, 9, 0, 0)),
                completion_at(task, at(2025, 6, 1, 9, 0, 0)),
            ])
        });

    let service = mocks.into_service();
    let board = service.task_board(&user()).await.expect("board loads");

    assert_eq!(board.streak_days, 1);
}

#[tokio::test]
async fn eligibility_for_unknown_task_is_not_found() {
    let now = at(2025, 6, 10, 12, 0, 0);
    let mut mocks = Mocks::new(now);
    mocks.templates.expect_find().return_once(|_| Ok(None));

    let service = mocks.into_service();
    let error = service
        .eligibility(&user(), &TaskId::random())
        .await
        .expect_err("unknown task");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
