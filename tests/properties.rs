//! Property tests for the reconciliation pipeline.

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use manday_engine::calculation::{ReconcileInput, reconcile};
use manday_engine::config::SchemaConfig;
use manday_engine::models::{DateRange, RawRow, Report};
use manday_engine::sources::NoHolidays;

const LEAVE_LABELS: [&str; 4] = ["Annual Leave", "Leave (UNPAID)", "Illness", "Un-assigned Time"];

fn base_date() -> NaiveDate {
    // a Monday
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

fn expected_credit(quarters: u32) -> Decimal {
    (Decimal::from(quarters) / Decimal::from(32))
        .min(Decimal::ONE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn progress_row(person: u8, day: NaiveDate, quarters: u32) -> RawRow {
    RawRow::new()
        .with("Date", day.format("%Y-%m-%d").to_string())
        .with("Duration", quarters as f64 / 4.0)
        .with("Firstname", format!("Person{}", person))
        .with("Lastname", "Test")
        .with("EmployeeID", format!("P{}", person))
        .with("ActivityName", "Build")
}

fn leave_row(person: u8, day: NaiveDate, quarters: u32, label: &str) -> RawRow {
    RawRow::new()
        .with("date", day.format("%d/%m/%Y").to_string())
        .with("length_hours", quarters as f64 / 4.0)
        .with("emp_firstname", format!("Person{}", person))
        .with("emp_lastname", "Test")
        .with("employee_id", format!("P{}", person))
        .with("name", label)
}

fn run(range: DateRange, progress: Vec<RawRow>, leave: Vec<RawRow>) -> Report {
    reconcile(
        &ReconcileInput::new(range, progress, leave),
        &SchemaConfig::default(),
        &NoHolidays,
    )
    .unwrap()
}

fn week() -> DateRange {
    DateRange::new(base_date(), base_date() + Days::new(6)).unwrap()
}

prop_compose! {
    fn arb_progress_row()(
        person in 0u8..4,
        offset in 0u64..14,
        quarters in 1u32..64,
    ) -> RawRow {
        progress_row(person, base_date() + Days::new(offset), quarters)
    }
}

prop_compose! {
    fn arb_leave_row()(
        person in 0u8..4,
        offset in 0u64..14,
        quarters in 1u32..40,
        label in 0usize..LEAVE_LABELS.len(),
    ) -> RawRow {
        leave_row(person, base_date() + Days::new(offset), quarters, LEAVE_LABELS[label])
    }
}

proptest! {
    #[test]
    fn test_leave_overrides_work_of_any_size(
        weekday in 0u64..5,
        work_quarters in 1u32..96,
        leave_quarters in 1u32..96,
    ) {
        let day = base_date() + Days::new(weekday);
        let report = run(
            week(),
            vec![progress_row(1, day, work_quarters)],
            vec![leave_row(1, day, leave_quarters, "Leave (UNPAID)")],
        );
        let person = report.person("p1").unwrap();

        prop_assert_eq!(person.mandays, Decimal::ZERO);
        prop_assert_eq!(person.leave_unpaid, expected_credit(leave_quarters));
        prop_assert_eq!(report.diagnostics.suppressed_work_entries, 1);
    }

    #[test]
    fn test_weekend_work_is_capped_overtime(
        weekend_day in 5u64..7,
        quarters in 1u32..96,
    ) {
        let day = base_date() + Days::new(weekend_day);
        prop_assert!(day.weekday().number_from_monday() >= 6);

        let report = run(week(), vec![progress_row(1, day, quarters)], Vec::new());
        let person = report.person("p1").unwrap();

        prop_assert_eq!(person.mandays, Decimal::ZERO);
        prop_assert_eq!(person.overtime, expected_credit(quarters));
        prop_assert!(person.overtime <= Decimal::ONE);
    }

    #[test]
    fn test_mandays_never_exceed_days_in_range(
        progress in prop::collection::vec(arb_progress_row(), 0..40),
        leave in prop::collection::vec(arb_leave_row(), 0..20),
    ) {
        let range = DateRange::new(base_date(), base_date() + Days::new(13)).unwrap();
        let days = Decimal::from(range.day_count());
        let report = run(range, progress, leave);

        for person in &report.summary {
            let credited = person.mandays + person.leave_unpaid + person.leave_illness;
            prop_assert!(
                credited <= days,
                "{} credited {} over {} days",
                person.person_key,
                credited,
                days
            );
            prop_assert!(person.overtime <= days);
        }
    }

    #[test]
    fn test_repeat_runs_are_byte_identical(
        progress in prop::collection::vec(arb_progress_row(), 0..30),
        leave in prop::collection::vec(arb_leave_row(), 0..15),
    ) {
        let range = DateRange::new(base_date(), base_date() + Days::new(13)).unwrap();
        let first = run(range, progress.clone(), leave.clone());
        let second = run(range, progress, leave);

        prop_assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
    }

    #[test]
    fn test_daily_detail_is_dense_for_any_range(
        length in 0u64..60,
        progress in prop::collection::vec(arb_progress_row(), 1..20),
    ) {
        let start = base_date();
        let end = start + Days::new(length);
        let range = DateRange::new(start, end).unwrap();
        let report = run(range, progress, Vec::new());

        for detail in report.daily.iter() {
            prop_assert_eq!(detail.days.len() as u64, length + 1);
            prop_assert_eq!(detail.days.keys().next(), Some(&start));
            prop_assert_eq!(detail.days.keys().last(), Some(&end));
        }
        for detail in report.overtime.iter() {
            prop_assert_eq!(detail.days.len() as u64, length + 1);
        }
    }
}
