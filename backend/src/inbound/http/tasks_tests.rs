//! Handler tests for the tasks endpoints.

use std::sync::Arc;

use actix_web::{test, web, App};
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::domain::completion::{CompletionId, TaskCompletion};
use crate::domain::ports::{
    CompletedTask, MockNotifications, MockReferrals, MockSpecialTasks, MockTaskWorkflow,
    MockUserDirectory, MockWallet, TaskBoard, TaskBoardEntry,
};
use crate::domain::{
    DomainError, SubmissionStatus, Taka, TaskId, TaskTemplate, TaskType, TelegramId, UidCheck,
};
use crate::inbound::http::auth::TELEGRAM_ID_HEADER;
use crate::inbound::http::state::HttpState;

use super::{check_uid, complete_task, task_board};

fn state_with(
    tasks: MockTaskWorkflow,
    special_tasks: MockSpecialTasks,
) -> HttpState {
    HttpState {
        tasks: Arc::new(tasks),
        special_tasks: Arc::new(special_tasks),
        users: Arc::new(MockUserDirectory::new()),
        referrals: Arc::new(MockReferrals::new()),
        wallet: Arc::new(MockWallet::new()),
        notifications: Arc::new(MockNotifications::new()),
    }
}

fn board_template(id: TaskId) -> TaskTemplate {
    TaskTemplate {
        id,
        title: "Daily Check-in".to_owned(),
        subtitle: "Earn every day".to_owned(),
        description: String::new(),
        reward: Taka::new(2),
        task_type: TaskType::Checkin,
        icon: "checkin".to_owned(),
        button_text: "CHECK IN".to_owned(),
        cooldown_secs: 86_400,
        max_completions: 1,
        url: None,
        is_active: true,
    }
}

#[actix_web::test]
async fn board_serialises_camel_case() {
    let task = TaskId::random();
    let mut tasks = MockTaskWorkflow::new();
    tasks.expect_task_board().return_once(move |_| {
        Ok(TaskBoard {
            tasks: vec![TaskBoardEntry {
                template: board_template(task),
                remaining_cooldown_secs: 120,
                completed: true,
            }],
            daily_checkin_done: true,
            streak_days: 3,
        })
    });

    let state = state_with(tasks, MockSpecialTasks::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(task_board)),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header((TELEGRAM_ID_HEADER, "123456789"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["dailyCheckinDone"], true);
    assert_eq!(body["streakDays"], 3);
    assert_eq!(body["tasks"][0]["remainingCooldownSecs"], 120);
    assert_eq!(body["tasks"][0]["special"], false);
    assert_eq!(body["tasks"][0]["taskType"], "checkin");
}

#[actix_web::test]
async fn missing_auth_header_is_rejected() {
    let state = state_with(MockTaskWorkflow::new(), MockSpecialTasks::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(task_board)),
    )
    .await;

    let request = test::TestRequest::get().uri("/api/v1/tasks").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 401);
}

#[actix_web::test]
async fn completion_returns_the_confirmed_balance() {
    let task = TaskId::random();
    let user = TelegramId::new("123456789").expect("valid id");
    let completed_at = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).single().expect("instant");

    let mut tasks = MockTaskWorkflow::new();
    let completion_user = user.clone();
    tasks
        .expect_complete_task()
        .withf(move |request| request.task_id == task)
        .return_once(move |_| {
            Ok(CompletedTask {
                completion: TaskCompletion {
                    id: CompletionId::random(),
                    user: completion_user,
                    task_id: task,
                    task_type: TaskType::Checkin,
                    task_title: "Daily Check-in".to_owned(),
                    reward: Taka::new(50),
                    completed_at,
                },
                new_balance: Taka::new(150),
                cooldown_secs: 86_400,
            })
        });

    let state = state_with(tasks, MockSpecialTasks::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(complete_task)),
    )
    .await;

    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task}/complete"))
        .insert_header((TELEGRAM_ID_HEADER, "123456789"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["newBalance"], 150);
    assert_eq!(body["reward"], 50);
    assert_eq!(body["cooldownSecs"], 86_400);
}

#[actix_web::test]
async fn cooldown_conflict_maps_to_409_with_details() {
    let task = TaskId::random();
    let mut tasks = MockTaskWorkflow::new();
    tasks.expect_complete_task().return_once(|_| {
        Err(DomainError::conflict("cooldown active")
            .with_details(serde_json::json!({ "remainingSecs": 86_399 })))
    });

    let state = state_with(tasks, MockSpecialTasks::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(complete_task)),
    )
    .await;

    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task}/complete"))
        .insert_header((TELEGRAM_ID_HEADER, "123456789"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 409);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["remainingSecs"], 86_399);
}

#[actix_web::test]
async fn malformed_task_id_is_a_bad_request() {
    let state = state_with(MockTaskWorkflow::new(), MockSpecialTasks::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(complete_task)),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/v1/tasks/not-a-uuid/complete")
        .insert_header((TELEGRAM_ID_HEADER, "123456789"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn uid_check_reports_own_submission_status() {
    let task = TaskId::random();
    let mut special = MockSpecialTasks::new();
    special
        .expect_check_uid()
        .return_once(|_, _, _| Ok(UidCheck::OwnSubmission(SubmissionStatus::Pending)));

    let state = state_with(MockTaskWorkflow::new(), special);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(check_uid)),
    )
    .await;

    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task}/uid-checks"))
        .insert_header((TELEGRAM_ID_HEADER, "123456789"))
        .set_json(serde_json::json!({ "uid": "ABC123" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["outcome"], "own_submission");
    assert_eq!(body["status"], "pending");
}
