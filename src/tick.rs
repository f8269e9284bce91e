//! Next-tick resolution.
//!
//! Pure functions computing when a [`CronExpression`] fires next. The search
//! seeds an approximate candidate by pinning each constrained component,
//! then walks forward one minute at a time until the candidate satisfies
//! every field and lies strictly after the reference time. The scan runs
//! once per scheduling cycle, not on a hot path, and parsing rejects field
//! combinations that can never match, so it always terminates.

use crate::expression::{CronExpression, CronField};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Truncate an instant to minute granularity.
pub fn truncate_to_minute(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .expect("zero seconds and nanoseconds are always in range")
}

/// Earliest instant strictly after `now` that satisfies `expr`.
///
/// An all-wildcard expression yields `now` advanced to the next whole
/// minute.
pub fn next_tick(expr: &CronExpression, now: DateTime<Utc>) -> DateTime<Utc> {
    let mut candidate = seed_candidate(expr, now);
    while !expr.matches(candidate) || candidate <= now {
        candidate += Duration::minutes(1);
    }
    candidate
}

/// Build the initial candidate by pinning constrained components.
///
/// The weekday cannot be written directly, so the date walks backward one
/// day at a time until it lands on the target weekday. Month, day, hour and
/// minute are then overwritten in that fixed order. Each overwrite is
/// independent of the others, so the candidate may land before `now` or on
/// an impossible intermediate date (a `with_*` returning `None` leaves the
/// component untouched); the forward scan in [`next_tick`] corrects both.
fn seed_candidate(expr: &CronExpression, now: DateTime<Utc>) -> DateTime<Utc> {
    let mut dt = truncate_to_minute(now);
    if let CronField::Value(weekday) = expr.day_of_week {
        while dt.weekday().num_days_from_monday() != weekday {
            dt -= Duration::days(1);
        }
    }
    if let CronField::Value(month) = expr.month {
        dt = dt.with_month(month).unwrap_or(dt);
    }
    if let CronField::Value(day) = expr.day_of_month {
        dt = dt.with_day(day).unwrap_or(dt);
    }
    if let CronField::Value(hour) = expr.hour {
        dt = dt.with_hour(hour).unwrap_or(dt);
    }
    if let CronField::Value(minute) = expr.minute {
        dt = dt.with_minute(minute).unwrap_or(dt);
    }
    dt
}

/// How long to sleep until `next`, measured against a live `now`.
///
/// Callers re-sample the clock at the moment of scheduling so time spent
/// computing the tick is not slept twice. A non-positive difference means
/// the tick is already due and the wait is zero.
pub fn sleep_interval(next: DateTime<Utc>, live_now: DateTime<Utc>) -> std::time::Duration {
    (next - live_now).to_std().unwrap_or(std::time::Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_truncate_zeroes_seconds() {
        let t = dt(2024, 3, 4, 23, 1, 45);
        assert_eq!(truncate_to_minute(t), dt(2024, 3, 4, 23, 1, 0));
    }

    #[test]
    fn test_all_wildcards_next_whole_minute() {
        let expr = CronExpression::parse("* * * * *").unwrap();
        assert_eq!(next_tick(&expr, dt(2024, 3, 4, 23, 1, 0)), dt(2024, 3, 4, 23, 2, 0));
        // mid-minute reference still lands on the next whole minute
        assert_eq!(next_tick(&expr, dt(2024, 3, 4, 23, 1, 45)), dt(2024, 3, 4, 23, 2, 0));
    }

    #[test]
    fn test_every_minute_sequence() {
        let expr = CronExpression::parse("* * * * *").unwrap();
        let start = dt(2024, 3, 4, 23, 1, 0);
        let tick1 = next_tick(&expr, start);
        let tick2 = next_tick(&expr, tick1);
        let tick3 = next_tick(&expr, tick2);
        let tick4 = next_tick(&expr, tick3);
        let tick5 = next_tick(&expr, tick4);
        assert_eq!(tick1, dt(2024, 3, 4, 23, 2, 0));
        assert_eq!(tick2, dt(2024, 3, 4, 23, 3, 0));
        assert_eq!(tick3, dt(2024, 3, 4, 23, 4, 0));
        assert_eq!(tick4, dt(2024, 3, 4, 23, 5, 0));
        assert_eq!(tick5, dt(2024, 3, 4, 23, 6, 0));
    }

    #[test]
    fn test_daily_rolls_over_to_next_date() {
        let expr = CronExpression::parse("@daily").unwrap();
        let next = next_tick(&expr, dt(2024, 3, 4, 23, 1, 0));
        assert_eq!(next, dt(2024, 3, 5, 0, 0, 0));
    }

    #[test]
    fn test_fixed_minute_wraps_to_next_hour() {
        let expr = CronExpression::parse("30 * * * *").unwrap();
        assert_eq!(next_tick(&expr, dt(2024, 3, 4, 23, 5, 0)), dt(2024, 3, 4, 23, 30, 0));
        assert_eq!(next_tick(&expr, dt(2024, 3, 4, 23, 45, 0)), dt(2024, 3, 5, 0, 30, 0));
    }

    #[test]
    fn test_weekday_search() {
        // @weekly fires at 00:00 on Monday (weekday 0); 2024-03-06 was a Wednesday
        let expr = CronExpression::parse("@weekly").unwrap();
        let next = next_tick(&expr, dt(2024, 3, 6, 12, 0, 0));
        assert_eq!(next, dt(2024, 3, 11, 0, 0, 0));
    }

    #[test]
    fn test_fixed_day_and_month() {
        let expr = CronExpression::parse("0 0 1 4 *").unwrap();
        let next = next_tick(&expr, dt(2024, 3, 4, 23, 1, 0));
        assert_eq!(next, dt(2024, 4, 1, 0, 0, 0));
    }

    #[test]
    fn test_candidate_on_impossible_intermediate_date() {
        // Seeding from Jan 31 with month=2 cannot produce Feb 31; the scan
        // must still land on the first valid instant.
        let expr = CronExpression::parse("0 0 * 2 *").unwrap();
        let next = next_tick(&expr, dt(2024, 1, 31, 12, 0, 0));
        assert_eq!(next, dt(2024, 2, 1, 0, 0, 0));
    }

    #[test]
    fn test_strict_progress() {
        let schedules = ["* * * * *", "0 * * * *", "@daily", "0 0 1 * *", "0 0 * * 3"];
        let times = [
            dt(2024, 1, 1, 0, 0, 0),
            dt(2024, 2, 29, 23, 59, 0),
            dt(2024, 12, 31, 23, 59, 30),
        ];
        for schedule in schedules {
            let expr = CronExpression::parse(schedule).unwrap();
            for now in times {
                let next = next_tick(&expr, now);
                assert!(next > now, "{schedule} at {now}");
                assert!(expr.matches(next), "{schedule} at {now}");
            }
        }
    }

    #[test]
    fn test_repeated_ticks_strictly_increase() {
        let expr = CronExpression::parse("0 * * * *").unwrap();
        let mut current = dt(2024, 3, 4, 22, 30, 0);
        for _ in 0..24 {
            let next = next_tick(&expr, current);
            assert!(next > current);
            current = next;
        }
    }

    #[test]
    fn test_sleep_interval_positive() {
        let next = dt(2024, 3, 4, 23, 2, 0);
        let live = dt(2024, 3, 4, 23, 1, 30);
        assert_eq!(sleep_interval(next, live), std::time::Duration::from_secs(30));
    }

    #[test]
    fn test_sleep_interval_clamps_to_zero() {
        let next = dt(2024, 3, 4, 23, 2, 0);
        let live = dt(2024, 3, 4, 23, 2, 10);
        assert_eq!(sleep_interval(next, live), std::time::Duration::ZERO);
    }
}
