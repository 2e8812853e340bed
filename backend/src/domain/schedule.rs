//! Cooldown and streak bookkeeping derived from completion history.
//!
//! Nothing here is stored: timers and streak counters are recomputed from
//! raw completion rows on every load. Recomputing from scratch is cheap at
//! the expected data volumes and cannot drift the way an incrementally
//! maintained counter can.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Remaining cooldown in seconds for a task last completed at
/// `last_completed_at`, clamped to zero.
///
/// A `cooldown_secs` of zero (no cooldown) always yields zero.
pub fn remaining_cooldown(
    cooldown_secs: i64,
    last_completed_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    if cooldown_secs <= 0 {
        return 0;
    }
    let elapsed = now.signed_duration_since(last_completed_at).num_seconds();
    (cooldown_secs - elapsed).max(0)
}

/// Whether any of `completion_days` falls on `today`.
///
/// Used for the daily check-in flag: eligibility flips back only after the
/// calendar day rolls over, regardless of how many hours have passed.
pub fn completed_today(completion_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> bool {
    completion_days.contains(&today)
}

/// Count of consecutive calendar days with at least one completion, ending
/// at `today` or yesterday.
///
/// A gap breaks the run: history before the gap never counts, even when a
/// later day has completions again (the run restarts from the later day).
pub fn current_streak(completion_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let start = if completion_days.contains(&today) {
        today
    } else if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        if completion_days.contains(&yesterday) {
            yesterday
        } else {
            return 0;
        }
    } else {
        return 0;
    };

    let mut streak = 0;
    let mut cursor = Some(start);
    while let Some(day) = cursor {
        if !completion_days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

/// Midnight at the start of `date`, as a UTC instant.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

/// Midnight at the start of the week containing `date`. Weeks start on
/// Sunday for the weekly stat windows.
pub fn start_of_week(date: NaiveDate) -> DateTime<Utc> {
    let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
    start_of_day(date.checked_sub_days(back).unwrap_or(date))
}

/// Midnight at the start of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date.with_day(1).unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn days(dates: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        dates.iter().copied().collect()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid instant")
    }

    #[rstest]
    fn cooldown_counts_down_from_the_last_completion() {
        let completed = at(2025, 6, 1, 12, 0, 0);
        let one_second_later = at(2025, 6, 1, 12, 0, 1);
        assert_eq!(remaining_cooldown(86_400, completed, one_second_later), 86_399);
    }

    #[rstest]
    fn cooldown_clamps_to_zero_once_elapsed() {
        let completed = at(2025, 6, 1, 12, 0, 0);
        let two_days_later = at(2025, 6, 3, 12, 0, 0);
        assert_eq!(remaining_cooldown(86_400, completed, two_days_later), 0);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn missing_cooldown_is_always_elapsed(#[case] cooldown: i64) {
        let completed = at(2025, 6, 1, 12, 0, 0);
        assert_eq!(remaining_cooldown(cooldown, completed, completed), 0);
    }

    #[rstest]
    fn checkin_flag_follows_the_calendar_day() {
        let today = date(2025, 6, 2);
        let history = days(&[date(2025, 6, 1)]);
        assert!(!completed_today(&history, today));
        assert!(completed_today(&history, date(2025, 6, 1)));
    }

    #[rstest]
    fn streak_counts_consecutive_days_ending_today() {
        let today = date(2025, 6, 5);
        let history = days(&[date(2025, 6, 3), date(2025, 6, 4), date(2025, 6, 5)]);
        assert_eq!(current_streak(&history, today), 3);
    }

    #[rstest]
    fn streak_may_end_yesterday() {
        let today = date(2025, 6, 5);
        let history = days(&[date(2025, 6, 3), date(2025, 6, 4)]);
        assert_eq!(current_streak(&history, today), 2);
    }

    #[rstest]
    fn streak_is_zero_after_a_two_day_gap() {
        let today = date(2025, 6, 5);
        let history = days(&[date(2025, 6, 1), date(2025, 6, 2), date(2025, 6, 3)]);
        assert_eq!(current_streak(&history, today), 0);
    }

    #[rstest]
    fn gap_breaks_the_run_and_a_later_completion_restarts_it() {
        // Three-day run, no completion on day 4, one on day 5: the old run
        // is dead and the day-5 completion starts a fresh run of one.
        let today = date(2025, 6, 5);
        let history = days(&[
            date(2025, 6, 1),
            date(2025, 6, 2),
            date(2025, 6, 3),
            date(2025, 6, 5),
        ]);
        assert_eq!(current_streak(&history, today), 1);
    }

    #[rstest]
    fn empty_history_has_no_streak() {
        assert_eq!(current_streak(&BTreeSet::new(), date(2025, 6, 5)), 0);
    }

    #[rstest]
    fn week_starts_on_sunday() {
        // 2025-06-04 is a Wednesday; the containing week starts 2025-06-01.
        assert_eq!(start_of_week(date(2025, 6, 4)), at(2025, 6, 1, 0, 0, 0));
        // A Sunday is its own week start.
        assert_eq!(start_of_week(date(2025, 6, 1)), at(2025, 6, 1, 0, 0, 0));
    }

    #[rstest]
    fn month_starts_on_the_first() {
        assert_eq!(start_of_month(date(2025, 6, 17)), at(2025, 6, 1, 0, 0, 0));
    }
}
