//! Tests for daily and weekly expansion.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use recurrence_engine::{
    generate, generate_all, Pattern, RecurrenceSpec, ViewWindow, MAX_COUNT,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn dates(spec: &RecurrenceSpec) -> Vec<NaiveDate> {
    generate_all(spec).iter().map(|i| i.date).collect()
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_start_already_on_weekday() {
    // 2024-01-01 is a Monday: no alignment needed.
    let spec = RecurrenceSpec::weekly(date(2024, 1, 1), time(9, 0), Weekday::Mon, 3);
    let result = generate_all(&spec);

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].date, date(2024, 1, 1));
    assert_eq!(result[1].date, date(2024, 1, 8));
    assert_eq!(result[2].date, date(2024, 1, 15));
    for instance in &result {
        assert_eq!(instance.time, time(9, 0));
    }
}

#[test]
fn weekly_aligns_forward_to_next_weekday() {
    // 2024-01-03 is a Wednesday; the next Monday is 2024-01-08.
    let spec = RecurrenceSpec::weekly(date(2024, 1, 3), time(9, 0), Weekday::Mon, 2);
    assert_eq!(dates(&spec), vec![date(2024, 1, 8), date(2024, 1, 15)]);
}

#[test]
fn weekly_alignment_never_moves_backward() {
    // Tuesday start with a Monday rule must skip six days, not go back one.
    let spec = RecurrenceSpec::weekly(date(2024, 1, 2), time(9, 0), Weekday::Mon, 1);
    assert_eq!(dates(&spec), vec![date(2024, 1, 8)]);
}

#[test]
fn weekly_alignment_crosses_year_boundary() {
    // 2024-12-30 is a Monday; the following Saturday is 2025-01-04.
    let spec = RecurrenceSpec::weekly(date(2024, 12, 30), time(18, 30), Weekday::Sat, 3);
    assert_eq!(
        dates(&spec),
        vec![date(2025, 1, 4), date(2025, 1, 11), date(2025, 1, 18)]
    );
}

#[test]
fn weekly_on_sunday() {
    let spec = RecurrenceSpec::weekly(date(2024, 1, 1), time(10, 0), Weekday::Sun, 2);
    let result = dates(&spec);
    assert_eq!(result, vec![date(2024, 1, 7), date(2024, 1, 14)]);
    assert!(result.iter().all(|d| d.weekday() == Weekday::Sun));
}

#[test]
fn aligned_start_matches_first_instance() {
    let spec = RecurrenceSpec::weekly(date(2024, 1, 3), time(9, 0), Weekday::Fri, 4);
    assert_eq!(spec.aligned_start(), Some(date(2024, 1, 5)));
    assert_eq!(generate_all(&spec)[0].date, date(2024, 1, 5));
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

#[test]
fn daily_three_consecutive_days() {
    let spec = RecurrenceSpec::daily(date(2024, 1, 1), time(9, 0), 3);
    assert_eq!(
        dates(&spec),
        vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
    );
}

#[test]
fn daily_crosses_leap_day() {
    let spec = RecurrenceSpec::daily(date(2024, 2, 28), time(7, 15), 3);
    assert_eq!(
        dates(&spec),
        vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
    );
}

#[test]
fn daily_ignores_weekday_alignment() {
    // A Wednesday start stays on Wednesday for daily rules.
    let spec = RecurrenceSpec::daily(date(2024, 1, 3), time(9, 0), 1);
    assert_eq!(spec.aligned_start(), Some(date(2024, 1, 3)));
    assert_eq!(dates(&spec), vec![date(2024, 1, 3)]);
}

// ---------------------------------------------------------------------------
// Counts and empty input
// ---------------------------------------------------------------------------

#[test]
fn missing_start_date_returns_empty() {
    let spec = RecurrenceSpec {
        start_date: None,
        start_time: time(9, 0),
        pattern: Pattern::Daily,
        count: 10,
    };
    assert!(generate(&spec, &ViewWindow::unbounded()).is_empty());
}

#[test]
fn count_zero_is_treated_as_one() {
    let spec = RecurrenceSpec::daily(date(2024, 1, 1), time(9, 0), 0);
    assert_eq!(spec.effective_count(), 1);
    assert_eq!(generate_all(&spec).len(), 1);
}

#[test]
fn count_above_maximum_is_clamped() {
    let spec = RecurrenceSpec::daily(date(2024, 1, 1), time(9, 0), 10_000);
    assert_eq!(spec.effective_count(), MAX_COUNT);
    let result = generate_all(&spec);
    assert_eq!(result.len(), MAX_COUNT as usize);
    // 366 days from 2024-01-01 (leap year) ends on 2024-12-31.
    assert_eq!(result.last().unwrap().date, date(2024, 12, 31));
}

#[test]
fn count_at_maximum_is_kept() {
    let spec = RecurrenceSpec::weekly(date(2024, 1, 1), time(9, 0), Weekday::Mon, MAX_COUNT);
    assert_eq!(generate_all(&spec).len(), MAX_COUNT as usize);
}

// ---------------------------------------------------------------------------
// Window tagging at generation time
// ---------------------------------------------------------------------------

#[test]
fn generation_tags_against_supplied_window() {
    let spec = RecurrenceSpec::weekly(date(2024, 1, 1), time(9, 0), Weekday::Mon, 3);
    let window = ViewWindow::new(date(2024, 1, 5), date(2024, 1, 10));
    let flags: Vec<bool> = generate(&spec, &window).iter().map(|i| i.in_window).collect();
    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn generation_without_window_marks_everything_visible() {
    let spec = RecurrenceSpec::daily(date(2024, 1, 1), time(23, 59), 20);
    assert!(generate_all(&spec).iter().all(|i| i.in_window));
}

#[test]
fn generation_is_idempotent() {
    let spec = RecurrenceSpec::weekly(date(2024, 5, 17), time(14, 45), Weekday::Thu, 12);
    let window = ViewWindow::new(date(2024, 6, 1), date(2024, 6, 30));
    assert_eq!(generate(&spec, &window), generate(&spec, &window));
}
