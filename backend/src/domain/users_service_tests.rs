//! Tests for the user directory service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use super::UserDirectoryService;
use crate::domain::error::ErrorCode;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{
    MockCompletionRepository, MockEarningsRepository, MockNotificationRepository,
    MockReferralRepository, MockUserRepository, StoreError, UserDirectory,
};
use crate::domain::user::{UserIdentity, UserProfile};

type Service = UserDirectoryService<
    MockUserRepository,
    MockReferralRepository,
    MockCompletionRepository,
    MockEarningsRepository,
    MockNotificationRepository,
>;

struct Mocks {
    users: MockUserRepository,
    referrals: MockReferralRepository,
    completions: MockCompletionRepository,
    earnings: MockEarningsRepository,
    notifications: MockNotificationRepository,
    clock: MockClock,
}

impl Mocks {
    fn new(now: DateTime<Utc>) -> Self {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        Self {
            users: MockUserRepository::new(),
            referrals: MockReferralRepository::new(),
            completions: MockCompletionRepository::new(),
            earnings: MockEarningsRepository::new(),
            notifications: MockNotificationRepository::new(),
            clock,
        }
    }

    fn into_service(self) -> Service {
        UserDirectoryService::new(
            Arc::new(self.users),
            Arc::new(self.referrals),
            Arc::new(self.completions),
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

fn identity() -> UserIdentity {
    UserIdentity {
        telegram_id: user(),
        username: Some("cashfan".to_owned()),
        first_name: Some("Cash".to_owned()),
        last_name: None,
        photo_url: None,
        referred_by: None,
    }
}

fn profile() -> UserProfile {
    let now = at(2025, 6, 1, 0, 0, 0);
    UserProfile {
        telegram_id: user(),
        username: Some("cashfan".to_owned()),
        first_name: Some("Cash".to_owned()),
        last_name: None,
        photo_url: None,
        balance: Taka::new(10),
        total_earnings: Taka::new(10),
        total_referrals: 0,
        level: 1,
        experience_points: 90,
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
async fn first_load_creates_the_row_with_defaults() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks.users.expect_find().return_once(|_| Ok(None));
    mocks
        .users
        .expect_insert()
        .withf(|record| {
            record.balance == Taka::ZERO
                && record.energy == 100
                && record.level == 1
                && record.referral_code == "BT456789"
        })
        .times(1)
        .return_once(|_| Ok(profile()));

    let service = mocks.into_service();
    let loaded = service.load_or_create(identity()).await.expect("created");
    assert_eq!(loaded.telegram_id, user());
}

#[tokio::test]
async fn losing_the_create_race_falls_back_to_the_existing_row() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    let mut find_calls = 0;
    mocks.users.expect_find().times(2).returning(move |_| {
        find_calls += 1;
        Ok(if find_calls == 1 { None } else { Some(profile()) })
    });
    mocks
        .users
        .expect_insert()
        .return_once(|_| Err(StoreError::duplicate("telegram_id taken")));

    let service = mocks.into_service();
    let loaded = service.load_or_create(identity()).await.expect("loaded");
    assert_eq!(loaded.telegram_id, user());
}

#[tokio::test]
async fn stats_aggregate_counts_and_ledger_totals() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .referrals
        .expect_count_for_referrer()
        .return_once(|_| Ok(12));
    let mut since_calls = 0;
    mocks
        .referrals
        .expect_count_for_referrer_since()
        .times(3)
        .returning(move |_, _| {
            since_calls += 1;
            Ok(match since_calls {
                1 => 2,
                2 => 5,
                _ => 9,
            })
        });
    mocks.completions.expect_count_for().return_once(|_| Ok(34));
    mocks
        .earnings
        .expect_total_for()
        .return_once(|_| Ok(Taka::new(500)));
    let mut ledger_calls = 0;
    mocks
        .earnings
        .expect_total_since()
        .times(3)
        .returning(move |_, _| {
            ledger_calls += 1;
            Ok(Taka::new(match ledger_calls {
                1 => 20,
                2 => 70,
                _ => 150,
            }))
        });

    let service = mocks.into_service();
    let stats = service.stats(&user()).await.expect("stats load");

    assert_eq!(stats.total_referrals, 12);
    assert_eq!(stats.today_referrals, 2);
    assert_eq!(stats.week_referrals, 5);
    assert_eq!(stats.month_referrals, 9);
    assert_eq!(stats.tasks_completed, 34);
    assert_eq!(stats.total_earnings, Taka::new(500));
    assert_eq!(stats.month_earnings, Taka::new(150));
}

#[tokio::test]
async fn experience_grant_levels_up_and_notifies() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks.users.expect_find().return_once(|_| Ok(Some(profile())));
    mocks
        .users
        .expect_set_experience()
        .withf(|_, xp, level| *xp == 140 && *level == 2)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .withf(|n| n.title == "Level Up!")
        .times(1)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    let updated = service
        .grant_experience(&user(), 50)
        .await
        .expect("xp granted");

    assert_eq!(updated.experience_points, 140);
    assert_eq!(updated.level, 2);
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks.users.expect_find().return_once(|_| Ok(None));

    let service = mocks.into_service();
    let error = service.profile(&user()).await.expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
