//! Tests for the day walk and the four schedule queries.
//!
//! Relative instants ("mon", "fri 10:30") resolve against Monday 2020-06-29.

use std::ops::ControlFlow;

use chrono::{NaiveDate, NaiveDateTime};
use crontime::{CronTimeError, RuleSpec, Schedule, SearchLimits, Window};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

fn schedule(specs: &[RuleSpec]) -> Schedule {
    Schedule::new(specs)
        .unwrap()
        .with_reference(at("2020-06-29 12:00:00"))
}

fn open(raw: &str) -> RuleSpec {
    RuleSpec::raw(raw)
}

fn closed(raw: &str) -> RuleSpec {
    RuleSpec::raw(raw).closed()
}

fn business_hours() -> Schedule {
    schedule(&[open("* 9-16 * * mon-fri"), closed("* 12 * * thu-fri")])
}

fn time_of(instant: Option<NaiveDateTime>) -> String {
    instant.unwrap().format("%H:%M:%S").to_string()
}

// ── is_open_at ──────────────────────────────────────────────────────────────

#[test]
fn open_rules_merge() {
    let schedule = schedule(&[
        open("* 8-14 * * mon-fri"),
        open("* 7 * * tue"),
        open("* 15 * * tue"),
        open("0-29 15 * * wed"),
        open("50-59 7 * * fri"),
    ]);
    let is_open = |instant: &str| schedule.is_open_at(instant).unwrap();

    assert!(is_open("mon 14:59:59"));
    assert!(!is_open("mon 15:00:00"));

    assert!(is_open("tue 07:00:00"));
    assert!(!is_open("tue 06:59:59"));
    assert!(is_open("tue 15:59:59"));
    assert!(!is_open("tue 16:00:00"));

    assert!(is_open("wed 15:29:59"));
    assert!(!is_open("wed 15:30:00"));

    assert!(is_open("fri 07:50:00"));
    assert!(!is_open("fri 07:49:59"));
}

#[test]
fn closed_rules_carve_open_time() {
    let schedule = schedule(&[
        open("* 8-14 * * mon-fri"),
        closed("* 7 * * mon-fri"),
        closed("* 15 * * mon-fri"),
        closed("* * * * tue"),
        closed("* 12 * * mon-fri"),
        closed("* 8 * * wed"),
        closed("* 14 * * wed"),
    ]);
    let is_open = |instant: &str| schedule.is_open_at(instant).unwrap();

    assert!(is_open("mon 08:00:00"));
    assert!(!is_open("mon 07:59:59"));
    assert!(is_open("mon 14:59:59"));
    assert!(!is_open("mon 15:00:00"));

    assert!(!is_open("tue 8:00:00"));
    assert!(!is_open("tue 14:59:59"));
    assert!(!is_open("tue 15:00:00"));

    assert!(is_open("wed 09:00:00"));
    assert!(!is_open("wed 08:59:59"));
    assert!(is_open("wed 13:59:59"));
    assert!(!is_open("wed 14:00:00"));
}

#[test]
fn only_closed_rules_get_an_implicit_open_rule() {
    let schedule = schedule(&[closed("* 12 * * mon-fri")]);

    assert_eq!(schedule.rules().len(), 2);
    assert!(schedule.rules()[0].is_open());
    assert!(schedule.is_open_at("mon 08:00:00").unwrap());
    assert!(!schedule.is_open_at("mon 12:59:59").unwrap());
    assert!(schedule.is_open_at("sat 12:30:00").unwrap());
}

#[test]
fn empty_schedule_is_always_open() {
    let schedule = schedule(&[]);
    assert!(schedule.is_open_at("sun 03:00:00").unwrap());
    assert_eq!(schedule.windows_on(date("2020-06-28")), vec![Window::new(0, 86_399)]);
}

#[test]
fn rule_order_matters() {
    // Opening after the closing rule restores the hour.
    let schedule = schedule(&[
        open("* 9-16 * * mon-fri"),
        closed("* 12 * * mon-fri"),
        open("* 12 * * mon"),
    ]);
    assert!(schedule.is_open_at("mon 12:30:00").unwrap());
    assert!(!schedule.is_open_at("tue 12:30:00").unwrap());
}

// ── open_duration ───────────────────────────────────────────────────────────

#[test]
fn open_duration_over_whole_days() {
    let schedule = business_hours();

    // 8h
    assert_eq!(schedule.open_duration("mon 00:00", "mon 23:59").unwrap(), 28_800);
    // 7h
    assert_eq!(schedule.open_duration("fri 00:00", "fri 23:59").unwrap(), 25_200);
}

#[test]
fn open_duration_clips_both_ends() {
    // 3h 19m 12s
    assert_eq!(
        business_hours()
            .open_duration("fri 10:30", "fri 14:49:12")
            .unwrap(),
        11_952
    );
}

#[test]
fn open_duration_spans_days() {
    // Mon-Wed 8h, Thu-Fri 7h, weekend closed.
    assert_eq!(
        business_hours()
            .open_duration("2020-06-29", "2020-07-05 23:00")
            .unwrap(),
        3 * 28_800 + 2 * 25_200
    );
}

#[test]
fn open_duration_midnight_end_counts_whole_day() {
    let schedule = business_hours();
    assert_eq!(
        schedule.open_duration("2020-06-29", "2020-06-29").unwrap(),
        28_800
    );
}

#[test]
fn open_duration_midnight_end_same_day_counts_rest_of_day() {
    // 10:00 to the end of Monday.
    let schedule = schedule(&[open("* 9-16 * * mon-fri")]);
    assert_eq!(
        schedule
            .open_duration("2020-06-29 10:00", "2020-06-29 00:00")
            .unwrap(),
        25_200
    );
}

#[test]
fn open_duration_same_day_later_from_is_zero() {
    assert_eq!(
        business_hours()
            .open_duration("2020-06-29 15:00", "2020-06-29 10:00")
            .unwrap(),
        0
    );
}

#[test]
fn open_duration_reversed_is_zero() {
    assert_eq!(
        business_hours()
            .open_duration("2020-07-01", "2020-06-29")
            .unwrap(),
        0
    );
}

// ── future_open_instant ─────────────────────────────────────────────────────

#[test]
fn future_open_instant_within_first_window() {
    let schedule = business_hours();

    assert_eq!(
        time_of(schedule.future_open_instant(20, "mon 9:20:12").unwrap()),
        "09:20:32"
    );
    assert_eq!(
        time_of(schedule.future_open_instant(3 * 3_600, "mon 9:20:12").unwrap()),
        "12:20:12"
    );
}

#[test]
fn future_open_instant_skips_closed_hours() {
    let schedule = schedule(&[
        open("* 9-16 * * mon-fri"),
        closed("* 10,12,14 * * mon-fri"),
        closed("* * 12-14 4 "),
    ]);

    assert_eq!(
        time_of(schedule.future_open_instant(3 * 3_600, "thu 9:20:12").unwrap()),
        "15:20:12"
    );
    assert_eq!(
        schedule
            .future_open_instant(3 * 3_600 + 5, "2020-06-23 15:20:12")
            .unwrap(),
        Some(at("2020-06-24 11:20:17"))
    );
    assert_eq!(
        schedule
            .future_open_instant(60 * 60 * 24 * 30 * 6, "2020-06-23 15:20:12")
            .unwrap(),
        Some(at("2023-10-27 15:20:12"))
    );
}

#[test]
fn future_open_instant_before_opening() {
    // Starting before the day opens: the first 60s end at 09:01:00.
    assert_eq!(
        business_hours()
            .future_open_instant(60, "2020-06-29 07:00:00")
            .unwrap(),
        Some(at("2020-06-29 09:01:00"))
    );
}

#[test]
fn future_open_instant_after_closing_moves_to_next_day() {
    assert_eq!(
        business_hours()
            .future_open_instant(10, "2020-06-29 18:00:00")
            .unwrap(),
        Some(at("2020-06-30 09:00:10"))
    );
}

#[test]
fn future_open_instant_gives_up_when_never_open() {
    let schedule = schedule(&[open("* * * * * * 1999")])
        .with_limits(SearchLimits {
            max_chunks: 10,
            ..SearchLimits::default()
        })
        .unwrap();

    assert_eq!(schedule.future_open_instant(1, "2020-06-29").unwrap(), None);
}

#[test]
fn future_open_instant_default_limits_terminate() {
    let schedule = schedule(&[open("* * * * * * 1999")]);
    assert_eq!(schedule.future_open_instant(1, "2020-06-29").unwrap(), None);
}

// ── next_open_days ──────────────────────────────────────────────────────────

#[test]
fn next_open_days_skips_weekend() {
    let schedule = schedule(&[open("* 9-16 * * mon-fri")]);
    let days = schedule.next_open_days(5, "2020-06-30").unwrap();

    let expected: Vec<(NaiveDate, Vec<Window>)> = [
        "2020-06-30",
        "2020-07-01",
        "2020-07-02",
        "2020-07-03",
        "2020-07-06",
    ]
    .iter()
    .map(|d| (date(d), vec![Window::new(32_400, 61_199)]))
    .collect();

    assert_eq!(days.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn next_open_days_with_closed_dates() {
    let schedule = schedule(&[
        open("* 9-16 * * mon-fri"),
        closed("* * 12,13 mar"),
        closed("* 12-23 16 mar"),
        closed("* 12 20 mar"),
    ]);
    let days = schedule.next_open_days(9, "2020-03-09").unwrap();

    let full = vec![Window::new(32_400, 61_199)];
    assert_eq!(days.len(), 9);
    assert_eq!(days[&date("2020-03-09")], full);
    assert_eq!(days[&date("2020-03-11")], full);
    assert!(!days.contains_key(&date("2020-03-12")));
    assert!(!days.contains_key(&date("2020-03-13")));
    assert_eq!(days[&date("2020-03-16")], vec![Window::new(32_400, 43_199)]);
    assert_eq!(
        days[&date("2020-03-20")],
        vec![Window::new(32_400, 43_199), Window::new(46_800, 61_199)]
    );
    assert_eq!(days.keys().last(), Some(&date("2020-03-23")));
}

#[test]
fn next_open_days_serializes_with_date_labels() {
    let schedule = schedule(&[open("* 9-16 * * mon-fri")]);
    let days = schedule.next_open_days(1, "2020-06-30").unwrap();

    assert_eq!(
        serde_json::to_string(&days).unwrap(),
        r#"{"2020-06-30":[{"from":32400,"to":61199}]}"#
    );
}

#[test]
fn next_open_days_zero_is_empty() {
    assert!(business_hours()
        .next_open_days(0, "2020-06-30")
        .unwrap()
        .is_empty());
}

#[test]
fn next_open_days_stops_at_limit() {
    let schedule = schedule(&[open("* * 9-16 * * * 2020")])
        .with_limits(SearchLimits {
            max_chunks: 2,
            ..SearchLimits::default()
        })
        .unwrap();

    // Two chunks of eight days each, all open.
    assert_eq!(schedule.next_open_days(100, "2020-06-01").unwrap().len(), 16);
}

// ── Day walk ────────────────────────────────────────────────────────────────

#[test]
fn walk_visits_each_day_in_order() {
    let schedule = business_hours();
    let mut seen = Vec::new();

    let flow = schedule.walk_days(date("2020-06-27"), date("2020-07-01"), |day, windows| {
        seen.push((day, windows.len()));
        ControlFlow::Continue(())
    });

    assert!(flow.is_continue());
    assert_eq!(
        seen,
        vec![
            (date("2020-06-27"), 0),
            (date("2020-06-28"), 0),
            (date("2020-06-29"), 1),
            (date("2020-06-30"), 1),
            (date("2020-07-01"), 1),
        ]
    );
}

#[test]
fn walk_stops_when_visitor_breaks() {
    let schedule = business_hours();
    let mut visited = 0;

    let flow = schedule.walk_days(date("2020-06-29"), date("2020-07-31"), |_, _| {
        visited += 1;
        if visited == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert!(flow.is_break());
    assert_eq!(visited, 3);
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn unparseable_instants_are_rejected() {
    let schedule = schedule(&[closed("* 12 * * mon-fri")]);
    let invalid = |result: Result<_, CronTimeError>| {
        matches!(result, Err(CronTimeError::InvalidArgument(_)))
    };

    assert!(invalid(schedule.is_open_at("wrong value").map(|_| ())));
    assert!(invalid(schedule.open_duration("wrong value", "now").map(|_| ())));
    assert!(invalid(schedule.open_duration("now", "wrong value").map(|_| ())));
    assert!(invalid(
        schedule.future_open_instant(15, "wrong value").map(|_| ())
    ));
    assert!(invalid(schedule.next_open_days(5, "wrong value").map(|_| ())));
}

#[test]
fn malformed_rules_fail_construction() {
    let err = Schedule::new(&[open("* 9-16 * * mon-fri"), open("* 25")]).unwrap_err();
    assert_eq!(
        err,
        CronTimeError::InvalidArgument("invalid hour interval: '25'".to_string())
    );
}

#[test]
fn schedule_from_json() {
    let schedule = Schedule::from_json(
        r#"[
            {"raw": "* 9-16 * * mon-fri"},
            {"hour": "12", "dayOfWeek": "thu-fri", "open": "no"}
        ]"#,
    )
    .unwrap()
    .with_reference(at("2020-06-29 12:00:00"));

    assert_eq!(schedule.open_duration("fri 00:00", "fri 23:59").unwrap(), 25_200);
    assert!(Schedule::from_json("{not json").is_err());
}

#[test]
fn schedule_from_json_null_open_closes() {
    let schedule = Schedule::from_json(
        r#"[
            {"raw": "* 12 * * mon-fri", "open": null},
            {"raw": "* 9 * * mon-fri"}
        ]"#,
    )
    .unwrap()
    .with_reference(at("2020-06-29 12:00:00"));

    assert_eq!(schedule.rules().len(), 2);
    assert!(!schedule.rules()[0].is_open());
    assert!(schedule.rules()[1].is_open());
    assert!(!schedule.is_open_at("mon 12:30").unwrap());
}

#[test]
fn invalid_limits_are_rejected() {
    let limits = SearchLimits {
        max_chunks: 0,
        ..SearchLimits::default()
    };
    assert!(business_hours().with_limits(limits).is_err());
    assert!(SearchLimits::from_json(r#"{"stride_days": 0}"#).is_err());
    assert_eq!(
        SearchLimits::from_json(r#"{"max_chunks": 5}"#).unwrap(),
        SearchLimits {
            chunk_days: 7,
            stride_days: 8,
            max_chunks: 5
        }
    );
}

#[test]
fn schedule_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schedule>();
}
