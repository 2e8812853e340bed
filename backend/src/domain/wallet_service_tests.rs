//! Tests for the wallet service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use super::WalletService;
use crate::domain::error::ErrorCode;
use crate::domain::identity::TelegramId;
use crate::domain::money::Taka;
use crate::domain::ports::{
    MockEarningsRepository, MockNotificationRepository, MockUserRepository,
    MockWithdrawalRepository, ResolveWithdrawalRequest, StoreError, Wallet,
    WithdrawalRequestForm, WithdrawalVerdict,
};
use crate::domain::user::UserProfile;
use crate::domain::withdrawal::{
    RejectionOutcome, WithdrawalId, WithdrawalMethod, WithdrawalRequest, WithdrawalStatus,
};

type Service = WalletService<
    MockWithdrawalRepository,
    MockUserRepository,
    MockEarningsRepository,
    MockNotificationRepository,
>;

struct Mocks {
    withdrawals: MockWithdrawalRepository,
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
            withdrawals: MockWithdrawalRepository::new(),
            users: MockUserRepository::new(),
            earnings: MockEarningsRepository::new(),
            notifications: MockNotificationRepository::new(),
            clock,
        }
    }

    fn into_service(self) -> Service {
        WalletService::new(
            Arc::new(self.withdrawals),
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

fn profile_with_balance(balance: Taka) -> UserProfile {
    let now = at(2025, 6, 1, 0, 0, 0);
    UserProfile {
        telegram_id: user(),
        username: None,
        first_name: None,
        last_name: None,
        photo_url: None,
        balance,
        total_earnings: Taka::new(900),
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

fn bkash_form(amount: Taka) -> WithdrawalRequestForm {
    WithdrawalRequestForm {
        user: user(),
        amount,
        method: WithdrawalMethod::Bkash,
        account_number: Some("01712345678".to_owned()),
        account_name: None,
        bank_name: None,
        crypto_symbol: None,
    }
}

fn stored_request(amount: Taka, status: WithdrawalStatus, notes: Option<&str>) -> WithdrawalRequest {
    WithdrawalRequest {
        id: WithdrawalId::random(),
        user: user(),
        amount,
        method: WithdrawalMethod::Bkash,
        account_number: "01712345678".to_owned(),
        account_name: "Bkash".to_owned(),
        bank_name: None,
        crypto_symbol: None,
        status,
        admin_notes: notes.map(str::to_owned),
        processed_at: None,
        created_at: at(2025, 6, 10, 11, 0, 0),
    }
}

#[tokio::test]
async fn a_valid_request_queues_and_deducts() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(500)))));
    mocks
        .withdrawals
        .expect_insert()
        .withf(|new| {
            new.amount == Taka::new(150)
                && new.account_number == "01712345678"
                // Mobile money defaults the holder name from the method.
                && new.account_name == "Bkash"
        })
        .times(1)
        .return_once(|_| Ok(stored_request(Taka::new(150), WithdrawalStatus::Pending, None)));
    mocks
        .users
        .expect_set_balances()
        .withf(|_, balance, total| *balance == Taka::new(350) && *total == Taka::new(900))
        .times(1)
        .return_once(|_, _, _| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .times(1)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    let receipt = service
        .request_withdrawal(bkash_form(Taka::new(150)))
        .await
        .expect("withdrawal queues");

    assert_eq!(receipt.new_balance, Taka::new(350));
    assert_eq!(receipt.request.status, WithdrawalStatus::Pending);
}

#[tokio::test]
async fn amounts_below_the_minimum_are_rejected_before_any_store_call() {
    let mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));

    let service = mocks.into_service();
    let error = service
        .request_withdrawal(bkash_form(Taka::new(99)))
        .await
        .expect_err("below minimum");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("minimum reported");
    assert_eq!(details["minAmount"], 100);
}

#[tokio::test]
async fn insufficient_balance_is_rejected() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(120)))));
    mocks.withdrawals.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .request_withdrawal(bkash_form(Taka::new(150)))
        .await
        .expect_err("insufficient balance");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("Insufficient"));
}

#[tokio::test]
async fn bank_withdrawals_require_full_details() {
    let mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));

    let service = mocks.into_service();
    let error = service
        .request_withdrawal(WithdrawalRequestForm {
            user: user(),
            amount: Taka::new(200),
            method: WithdrawalMethod::Bank,
            account_number: Some("0012345".to_owned()),
            account_name: None,
            bank_name: Some("Example Bank".to_owned()),
            crypto_symbol: None,
        })
        .await
        .expect_err("missing holder name");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("bank details"));
}

#[tokio::test]
async fn crypto_account_name_defaults_to_the_symbol() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(500)))));
    mocks
        .withdrawals
        .expect_insert()
        .withf(|new| new.account_name == "USDT Wallet" && new.crypto_symbol.as_deref() == Some("USDT"))
        .times(1)
        .return_once(|_| Ok(stored_request(Taka::new(200), WithdrawalStatus::Pending, None)));
    mocks.users.expect_set_balances().return_once(|_, _, _| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    service
        .request_withdrawal(WithdrawalRequestForm {
            user: user(),
            amount: Taka::new(200),
            method: WithdrawalMethod::Crypto,
            account_number: Some("0xabc123".to_owned()),
            account_name: None,
            bank_name: None,
            crypto_symbol: Some("USDT".to_owned()),
        })
        .await
        .expect("crypto withdrawal queues");
}

#[tokio::test]
async fn failed_deduction_leaves_the_request_queued_and_surfaces() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(500)))));
    mocks
        .withdrawals
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(stored_request(Taka::new(150), WithdrawalStatus::Pending, None)));
    mocks
        .users
        .expect_set_balances()
        .return_once(|_, _, _| Err(StoreError::connection("lost connection")));
    mocks.notifications.expect_insert().times(0);

    let service = mocks.into_service();
    let error = service
        .request_withdrawal(bkash_form(Taka::new(150)))
        .await
        .expect_err("deduction failure surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn history_classifies_rejections() {
    let mut mocks = Mocks::new(at(2025, 6, 10, 12, 0, 0));
    mocks
        .withdrawals
        .expect_list_for_user()
        .return_once(|_, _| {
            Ok(vec![
                stored_request(Taka::new(100), WithdrawalStatus::Approved, None),
                stored_request(Taka::new(200), WithdrawalStatus::Rejected, Some("fraud attempt")),
                stored_request(Taka::new(300), WithdrawalStatus::Rejected, Some("number unreachable")),
            ])
        });

    let service = mocks.into_service();
    let history = service.history(&user()).await.expect("history loads");

    assert_eq!(history.len(), 3);
    assert_eq!(history.first().and_then(|v| v.rejection), None);
    assert_eq!(
        history.get(1).and_then(|v| v.rejection),
        Some(RejectionOutcome::Forfeited)
    );
    assert_eq!(
        history.get(2).and_then(|v| v.rejection),
        Some(RejectionOutcome::Refunded)
    );
}

#[tokio::test]
async fn standard_rejection_refunds_the_amount() {
    let now = at(2025, 6, 11, 9, 0, 0);
    let pending = stored_request(Taka::new(150), WithdrawalStatus::Pending, None);
    let id = pending.id;

    let mut mocks = Mocks::new(now);
    mocks
        .withdrawals
        .expect_find()
        .return_once(move |_| Ok(Some(pending)));
    mocks
        .withdrawals
        .expect_mark_resolved()
        .return_once(move |_, status, notes, processed_at| {
            let mut updated = stored_request(Taka::new(150), status, None);
            updated.id = id;
            updated.admin_notes = notes;
            updated.processed_at = Some(processed_at);
            Ok(Some(updated))
        });
    mocks
        .users
        .expect_find()
        .return_once(|_| Ok(Some(profile_with_balance(Taka::new(50)))));
    mocks
        .users
        .expect_set_balances()
        .withf(|_, balance, _| *balance == Taka::new(200))
        .times(1)
        .return_once(|_, _, _| Ok(()));
    mocks.earnings.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_insert()
        .withf(|n| n.message.contains("refunded"))
        .times(1)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    let resolved = service
        .resolve_withdrawal(ResolveWithdrawalRequest {
            withdrawal_id: id,
            verdict: WithdrawalVerdict::Reject,
            notes: Some("number unreachable".to_owned()),
        })
        .await
        .expect("rejection resolves");

    assert_eq!(resolved.status, WithdrawalStatus::Rejected);
}

#[tokio::test]
async fn fraud_rejection_forfeits_the_amount() {
    let now = at(2025, 6, 11, 9, 0, 0);
    let pending = stored_request(Taka::new(150), WithdrawalStatus::Pending, None);
    let id = pending.id;

    let mut mocks = Mocks::new(now);
    mocks
        .withdrawals
        .expect_find()
        .return_once(move |_| Ok(Some(pending)));
    mocks
        .withdrawals
        .expect_mark_resolved()
        .return_once(move |_, status, notes, processed_at| {
            let mut updated = stored_request(Taka::new(150), status, None);
            updated.id = id;
            updated.admin_notes = notes;
            updated.processed_at = Some(processed_at);
            Ok(Some(updated))
        });
    // No refund path: the balance is never touched.
    mocks.users.expect_find().times(0);
    mocks.users.expect_set_balances().times(0);
    mocks
        .notifications
        .expect_insert()
        .withf(|n| n.message.contains("No refund"))
        .times(1)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    service
        .resolve_withdrawal(ResolveWithdrawalRequest {
            withdrawal_id: id,
            verdict: WithdrawalVerdict::Reject,
            notes: Some("fraud attempt".to_owned()),
        })
        .await
        .expect("rejection resolves");
}

#[tokio::test]
async fn approval_marks_the_request_processed() {
    let now = at(2025, 6, 11, 9, 0, 0);
    let pending = stored_request(Taka::new(150), WithdrawalStatus::Pending, None);
    let id = pending.id;

    let mut mocks = Mocks::new(now);
    mocks
        .withdrawals
        .expect_find()
        .return_once(move |_| Ok(Some(pending)));
    mocks
        .withdrawals
        .expect_mark_resolved()
        .withf(move |rid, status, _, _| *rid == id && *status == WithdrawalStatus::Approved)
        .return_once(move |_, status, _, processed_at| {
            let mut updated = stored_request(Taka::new(150), status, None);
            updated.id = id;
            updated.processed_at = Some(processed_at);
            Ok(Some(updated))
        });
    mocks
        .notifications
        .expect_insert()
        .times(1)
        .returning(|_| Err(StoreError::query("sink closed")));

    let service = mocks.into_service();
    let resolved = service
        .resolve_withdrawal(ResolveWithdrawalRequest {
            withdrawal_id: id,
            verdict: WithdrawalVerdict::Approve,
            notes: None,
        })
        .await
        .expect("approval resolves");

    assert_eq!(resolved.status, WithdrawalStatus::Approved);
    assert!(resolved.processed_at.is_some());
}
