//! Tests for the referrals service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use uuid::Uuid;

use super::ReferralsService;
use crate::domain::error::ErrorCode;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{
    MockEarningsRepository, MockNotificationRepository, MockReferralRepository,
    MockUserRepository, RecordReferralRequest, Referrals, StoreError,
};
use crate::domain::referral::Referral;
use crate::domain::user::UserProfile;

type Service = ReferralsService<
    MockReferralRepository,
    MockUserRepository,
    MockEarningsRepository,
    MockNotificationRepository,
>;

struct Mocks {
    referrals: MockReferralRepository,
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
            referrals: MockReferralRepository::new(),
            users: MockUserRepository::new(),
            earnings: MockEarningsRepository::new(),
            notifications: MockNotificationRepository::new(),
            clock,
        }
    }

    fn into_service(self) -> Service {
        ReferralsService::new(
            Arc::new(self.referrals),
            Arc::new(self.users),
            Arc::new(self.earnings),
            Arc::new(self.notifications),
            Arc::new(self.clock),
            Taka::new(2),
        )
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid instant")
}

fn referrer() -> TelegramId {
    TelegramId::new("111111111").expect("valid id")
}

fn referred() -> TelegramId {
    TelegramId::new("222222222").expect("valid id")
}

fn profile_for(user: TelegramId, balance: Taka) -> UserProfile {
    let now = at(2025, 6, 1, 0, 0, 0);
    UserProfile {
        referral_code: user.referral_code(),
        telegram_id: user,
        username: None,
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
        referred_by: None,
        is_verified: false,
        is_banned: false,
        ban_reason: None,
        created_at: now,
        updated_at: now,
    }
}

fn stored_referral() -> Referral {
    Referral {
        id: Uuid::new_v4(),
        referrer: referrer(),
        referred: referred(),
        reward: Taka::new(2),
        created_at: at(2025, 6, 10, 12, 0, 0),
    }
}

#[tokio::test]
async fn recording_a_referral_credits_both_sides() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    // First find: the referred user must exist. Then one find per side
    // while crediting.
    let mut find_calls = 0;
    mocks.users.expect_find().times(3).returning(move |id| {
        find_calls += 1;
        let balance = if *id == referrer() { Taka::new(50) } else { Taka::new(0) };
        Ok(Some(profile_for(id.clone(), balance)))
    });
    mocks
        .referrals
        .expect_exists_for_referred()
        .return_once(|_| Ok(false));
    mocks
        .referrals
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(stored_referral()));
    let mut credits = Vec::new();
    mocks
        .users
        .expect_set_balances()
        .times(2)
        .returning(move |id, balance, _| {
            credits.push((id.clone(), balance));
            let expected = if *id == referrer() { Taka::new(52) } else { Taka::new(2) };
            assert_eq!(balance, expected);
            Ok(())
        });
    mocks.earnings.expect_insert().times(2).returning(|_| Ok(()));
    mocks
        .referrals
        .expect_count_for_referrer()
        .return_once(|_| Ok(7));
    mocks
        .users
        .expect_set_total_referrals()
        .withf(|_, total| *total == 7)
        .times(1)
        .return_once(|_, _| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .times(2)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    let referral = service
        .record_referral(RecordReferralRequest {
            referrer: referrer(),
            referred: referred(),
        })
        .await
        .expect("referral records");

    assert_eq!(referral.reward, Taka::new(2));
}

#[tokio::test]
async fn a_user_can_be_referred_only_once() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .users
        .expect_find()
        .return_once(|id| Ok(Some(profile_for(id.clone(), Taka::ZERO))));
    mocks
        .referrals
        .expect_exists_for_referred()
        .return_once(|_| Ok(true));
    mocks.referrals.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .record_referral(RecordReferralRequest {
            referrer: referrer(),
            referred: referred(),
        })
        .await
        .expect_err("second referral rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn unknown_referred_user_is_rejected() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks.users.expect_find().return_once(|_| Ok(None));
    mocks.referrals.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .record_referral(RecordReferralRequest {
            referrer: referrer(),
            referred: referred(),
        })
        .await
        .expect_err("unknown referred user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn self_referral_is_rejected_before_any_store_call() {
    let mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));

    let service = mocks.into_service();
    let error = service
        .record_referral(RecordReferralRequest {
            referrer: referrer(),
            referred: referrer(),
        })
        .await
        .expect_err("self referral rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn summary_reports_counts_and_ladder_position() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .referrals
        .expect_count_for_referrer()
        .return_once(|_| Ok(150));
    let mut calls = 0;
    mocks
        .referrals
        .expect_count_for_referrer_since()
        .times(3)
        .returning(move |_, _| {
            calls += 1;
            Ok(match calls {
                1 => 3,
                2 => 12,
                _ => 40,
            })
        });

    let service = mocks.into_service();
    let summary = service.summary(&referrer()).await.expect("summary loads");

    assert_eq!(summary.total, 150);
    assert_eq!(summary.today, 3);
    assert_eq!(summary.this_week, 12);
    assert_eq!(summary.this_month, 40);
    assert_eq!(summary.current_level.map(|l| l.level), Some(1));
    assert_eq!(summary.next_level.map(|l| l.level), Some(2));
}
