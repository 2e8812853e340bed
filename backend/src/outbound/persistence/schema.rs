//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them
//! for compile-time query validation. Regenerate with `diesel
//! print-schema` after changing migrations.

diesel::table! {
    /// User accounts keyed by Telegram id.
    ///
    /// `balance` and `total_earnings` are whole taka. `referral_code` is
    /// derived from the Telegram id at signup and never changes.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Telegram user id (decimal string, unique).
        telegram_id -> Varchar,
        /// Telegram username, when shared.
        username -> Nullable<Varchar>,
        /// First name, when shared.
        first_name -> Nullable<Varchar>,
        /// Last name, when shared.
        last_name -> Nullable<Varchar>,
        /// Avatar URL, when shared.
        photo_url -> Nullable<Text>,
        /// Spendable balance in whole taka.
        balance -> Int8,
        /// Lifetime credited rewards in whole taka.
        total_earnings -> Int8,
        /// Lifetime referral count.
        total_referrals -> Int8,
        /// Gamification level.
        level -> Int4,
        /// Accumulated experience points.
        experience_points -> Int8,
        /// Mining power stat.
        mining_power -> Int8,
        /// Current energy.
        energy -> Int4,
        /// Energy cap.
        max_energy -> Int4,
        /// Claim streak counter.
        claim_streak -> Int4,
        /// Last claim instant.
        last_claim -> Nullable<Timestamptz>,
        /// Shareable referral code (unique).
        referral_code -> Varchar,
        /// Referrer's Telegram id, when joined through a link.
        referred_by -> Nullable<Varchar>,
        /// Manual verification flag.
        is_verified -> Bool,
        /// Ban flag.
        is_banned -> Bool,
        /// Reason recorded when banning.
        ban_reason -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task definitions, written only by the admin console.
    task_templates (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Headline shown on the task card.
        title -> Varchar,
        /// Secondary line shown on the task card.
        subtitle -> Varchar,
        /// Longer description shown on demand.
        description -> Text,
        /// Reward in whole taka.
        reward -> Int8,
        /// Category tag (checkin, daily, social, referral,
        /// trading_platform, bonus).
        task_type -> Varchar,
        /// Icon hint for the client.
        icon -> Varchar,
        /// Call-to-action label.
        button_text -> Varchar,
        /// Minimum seconds between completions; 0 disables the cooldown.
        cooldown_secs -> Int8,
        /// Advertised completion cap.
        max_completions -> Int8,
        /// External link opened before completing.
        url -> Nullable<Text>,
        /// Inactive templates are hidden and never eligible.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only task completion facts.
    ///
    /// Cooldowns and streaks are derived by scanning this table; there is
    /// no stored counter to drift.
    task_completions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Completing user's Telegram id.
        user_id -> Varchar,
        /// Completed template id.
        task_id -> Uuid,
        /// Template category at completion time.
        task_type -> Varchar,
        /// Template title at completion time.
        task_title -> Varchar,
        /// Reward credited, in whole taka.
        reward_amount -> Int8,
        /// Completion instant (service clock).
        completed_at -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Special-task UID submissions.
    ///
    /// A unique index on `(task_id, uid_submitted)` arbitrates concurrent
    /// submissions of the same UID; the application pre-check only shapes
    /// the error message.
    special_task_submissions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Submitting user's Telegram id.
        user_id -> Varchar,
        /// The special task the UID evidences.
        task_id -> Uuid,
        /// Template category at submission time.
        task_type -> Varchar,
        /// The submitted external identifier.
        uid_submitted -> Varchar,
        /// Lifecycle state (pending, verified, rejected).
        status -> Varchar,
        /// Reward copied from the template at submission time.
        reward_amount -> Int8,
        /// Free-text notes recorded by the admin console.
        admin_notes -> Nullable<Text>,
        /// Verification instant, when verified.
        verified_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Referrer/referred links; one row per referred user.
    referrals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Referrer's Telegram id.
        referrer_id -> Varchar,
        /// Referred user's Telegram id (unique).
        referred_id -> Varchar,
        /// Bonus credited to each side, in whole taka.
        reward_amount -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Earnings ledger used for display aggregates.
    earnings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Credited user's Telegram id.
        user_id -> Varchar,
        /// Entry amount in whole taka; positive for credits.
        amount -> Int8,
        /// Provenance tag (task, referral, bonus, withdrawal, refund).
        source -> Varchar,
        /// Human-readable context.
        description -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Withdrawal requests.
    withdrawal_requests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Requesting user's Telegram id.
        user_id -> Varchar,
        /// Requested amount in whole taka.
        amount -> Int8,
        /// Payout channel tag.
        method -> Varchar,
        /// Mobile number, bank account number, or wallet address.
        account_number -> Varchar,
        /// Account holder name.
        account_name -> Varchar,
        /// Bank name, for bank transfers.
        bank_name -> Nullable<Varchar>,
        /// Currency symbol, for crypto payouts.
        crypto_symbol -> Nullable<Varchar>,
        /// Lifecycle state (pending, approved, rejected).
        status -> Varchar,
        /// Free-text notes recorded by the admin console.
        admin_notes -> Nullable<Text>,
        /// Resolution instant, when resolved.
        processed_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-facing notifications. Soft-deleted, never removed.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient's Telegram id.
        user_id -> Varchar,
        /// Severity tag (success, warning, info, error).
        kind -> Varchar,
        /// Short headline.
        title -> Varchar,
        /// Body text.
        message -> Text,
        /// Whether the user has opened it.
        is_read -> Bool,
        /// Soft-deletion flag.
        is_deleted -> Bool,
        /// Optional link the client may follow.
        action_url -> Nullable<Text>,
        /// Free-form extra payload.
        metadata -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    task_templates,
    task_completions,
    special_task_submissions,
    referrals,
    earnings,
    withdrawal_requests,
    notifications,
);
