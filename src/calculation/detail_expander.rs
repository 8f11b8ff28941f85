//! Day-by-day detail views.
//!
//! A raw duration view for auditing, independent of the aggregator's
//! bucketing. Daily hours are the plain sum of every counted entry, leave of
//! every kind included. Overtime is the uncapped `hours / 8` of every counted
//! entry on a weekend or holiday date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::aggregator::HOURS_PER_MANDAY;
use super::calendar::DayClassifier;
use crate::models::{DailyDetail, DateRange, NormalizedEntry, OvertimeDetail, PersonSummary};

/// Detail matrices keyed by person.
#[derive(Debug, Clone, Default)]
pub struct DetailViews {
    /// Worked and leave hours per day.
    pub daily: BTreeMap<String, DailyDetail>,
    /// Weekend and holiday hours per day, in mandays.
    pub overtime: BTreeMap<String, OvertimeDetail>,
}

impl DetailViews {
    /// Returns the views in summary order, leaving out people not in
    /// `summary`.
    pub fn ordered_by(
        mut self,
        summary: &[PersonSummary],
    ) -> (Vec<DailyDetail>, Vec<OvertimeDetail>) {
        let daily = summary
            .iter()
            .filter_map(|row| self.daily.remove(&row.person_key))
            .collect();
        let overtime = summary
            .iter()
            .filter_map(|row| self.overtime.remove(&row.person_key))
            .collect();
        (daily, overtime)
    }
}

#[derive(Debug, Default)]
struct PersonDays {
    display_name: String,
    employee_id: Option<String>,
    hours: BTreeMap<NaiveDate, Decimal>,
}

impl PersonDays {
    fn record(&mut self, entry: &NormalizedEntry) {
        if self.display_name.is_empty() {
            self.display_name = entry.person_display_name.trim().to_string();
        }
        if self.employee_id.is_none() {
            self.employee_id = entry.employee_id.clone();
        }
        *self.hours.entry(entry.date).or_default() += entry.duration_hours;
    }
}

/// Expands entries into dense per-day views over `range`.
///
/// `leave` holds the leave-export entries before resolution, so leave masked
/// by a higher-priority kind still shows up. Progress rows on a day with
/// exported leave are left out, matching what the summary counts.
pub fn expand_details<C: DayClassifier + ?Sized>(
    progress: &[NormalizedEntry],
    leave: &[NormalizedEntry],
    range: &DateRange,
    calendar: &C,
) -> DetailViews {
    let leave_days: BTreeSet<(&str, NaiveDate)> = leave
        .iter()
        .map(|e| (e.person_key.as_str(), e.date))
        .collect();

    let mut people: BTreeMap<&str, PersonDays> = BTreeMap::new();
    let counted = progress
        .iter()
        .filter(|e| !leave_days.contains(&(e.person_key.as_str(), e.date)))
        .chain(leave);
    for entry in counted {
        if range.contains_date(entry.date) {
            people
                .entry(entry.person_key.as_str())
                .or_default()
                .record(entry);
        }
    }

    let mut views = DetailViews::default();
    for (person_key, days) in people {
        let display_name = if days.display_name.is_empty() {
            person_key.to_string()
        } else {
            days.display_name
        };

        let daily_days: BTreeMap<NaiveDate, Decimal> = range
            .days()
            .map(|day| (day, days.hours.get(&day).copied().unwrap_or_default()))
            .collect();
        let overtime_days: BTreeMap<NaiveDate, Decimal> = daily_days
            .iter()
            .map(|(day, hours)| {
                let value = if calendar.is_overtime_day(*day) {
                    *hours / HOURS_PER_MANDAY
                } else {
                    Decimal::ZERO
                };
                (*day, value)
            })
            .collect();

        views.daily.insert(
            person_key.to_string(),
            DailyDetail {
                person_key: person_key.to_string(),
                display_name: display_name.clone(),
                employee_id: days.employee_id.clone(),
                total_duration_hours: daily_days.values().copied().sum(),
                days: daily_days,
            },
        );
        views.overtime.insert(
            person_key.to_string(),
            OvertimeDetail {
                person_key: person_key.to_string(),
                display_name,
                employee_id: days.employee_id,
                total_overtime: overtime_days.values().copied().sum(),
                days: overtime_days,
            },
        );
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calendar::HolidayCalendar;
    use crate::models::{EntrySource, LeaveKind};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn work(key: &str, day: &str, hours: &str) -> NormalizedEntry {
        NormalizedEntry {
            person_key: key.to_string(),
            person_display_name: format!("Person {}", key),
            employee_id: None,
            date: date(day),
            duration_hours: dec(hours),
            source: EntrySource::Work,
            leave_kind: None,
            leave_label: None,
            activity_label: None,
        }
    }

    fn leave(key: &str, day: &str, hours: &str, kind: LeaveKind) -> NormalizedEntry {
        NormalizedEntry {
            source: EntrySource::Leave,
            leave_kind: Some(kind),
            ..work(key, day, hours)
        }
    }

    fn first_week() -> DateRange {
        DateRange::new(date("2024-01-01"), date("2024-01-07")).unwrap()
    }

    #[test]
    fn test_daily_is_dense_over_range() {
        let views = expand_details(
            &[work("a", "2024-01-02", "8")],
            &[],
            &first_week(),
            &HolidayCalendar::default(),
        );
        let daily = &views.daily["a"];

        assert_eq!(daily.days.len(), 7);
        assert_eq!(daily.days.keys().next(), Some(&date("2024-01-01")));
        assert_eq!(daily.days.keys().last(), Some(&date("2024-01-07")));
        assert_eq!(daily.days[&date("2024-01-02")], dec("8"));
        assert_eq!(daily.days[&date("2024-01-03")], Decimal::ZERO);
        assert_eq!(daily.total_duration_hours, dec("8"));
    }

    #[test]
    fn test_work_and_leave_sum_in_daily() {
        let views = expand_details(
            &[work("a", "2024-01-02", "6"), work("a", "2024-01-02", "3")],
            &[leave("a", "2024-01-03", "4", LeaveKind::Illness)],
            &first_week(),
            &HolidayCalendar::default(),
        );
        let daily = &views.daily["a"];
        assert_eq!(daily.days[&date("2024-01-02")], dec("9"));
        assert_eq!(daily.days[&date("2024-01-03")], dec("4"));
        assert_eq!(daily.total_duration_hours, dec("13"));
    }

    #[test]
    fn test_overtime_only_on_weekends_and_holidays() {
        let calendar = HolidayCalendar::new([date("2024-01-01")]);
        let views = expand_details(
            &[
                work("a", "2024-01-01", "4"),
                work("a", "2024-01-02", "8"),
                work("a", "2024-01-06", "10"),
            ],
            &[],
            &first_week(),
            &calendar,
        );
        let overtime = &views.overtime["a"];

        assert_eq!(overtime.days.len(), 7);
        assert_eq!(overtime.days[&date("2024-01-01")], dec("0.5"));
        assert_eq!(overtime.days[&date("2024-01-02")], Decimal::ZERO);
        // uncapped in the detail view
        assert_eq!(overtime.days[&date("2024-01-06")], dec("1.25"));
        assert_eq!(overtime.total_overtime, dec("1.75"));
        assert_eq!(overtime.non_zero_days().count(), 2);
    }

    #[test]
    fn test_work_under_leave_is_left_out() {
        let views = expand_details(
            &[work("a", "2024-01-02", "5")],
            &[leave("a", "2024-01-02", "8", LeaveKind::Unpaid)],
            &first_week(),
            &HolidayCalendar::default(),
        );
        assert_eq!(views.daily["a"].days[&date("2024-01-02")], dec("8"));
    }

    #[test]
    fn test_masked_leave_still_counts_in_daily() {
        let views = expand_details(
            &[],
            &[
                leave("a", "2024-01-02", "6", LeaveKind::Paid),
                leave("a", "2024-01-02", "2", LeaveKind::Unassigned),
            ],
            &first_week(),
            &HolidayCalendar::default(),
        );
        assert_eq!(views.daily["a"].days[&date("2024-01-02")], dec("8"));
        assert_eq!(views.daily["a"].total_duration_hours, dec("8"));
    }

    #[test]
    fn test_unassigned_progress_time_sums_with_work() {
        let mut unassigned = leave("a", "2024-01-02", "2", LeaveKind::Unassigned);
        unassigned.activity_label = Some("Un-assigned Time".to_string());
        let views = expand_details(
            &[work("a", "2024-01-02", "6"), unassigned],
            &[],
            &first_week(),
            &HolidayCalendar::default(),
        );
        assert_eq!(views.daily["a"].days[&date("2024-01-02")], dec("8"));
    }

    #[test]
    fn test_weekend_leave_counts_as_overtime() {
        // 2024-01-06 is a Saturday
        let views = expand_details(
            &[],
            &[leave("a", "2024-01-06", "4", LeaveKind::Illness)],
            &first_week(),
            &HolidayCalendar::default(),
        );
        assert_eq!(views.overtime["a"].days[&date("2024-01-06")], dec("0.5"));
        assert_eq!(views.overtime["a"].total_overtime, dec("0.5"));
    }

    #[test]
    fn test_entries_outside_range_do_not_appear() {
        let views = expand_details(
            &[work("a", "2024-01-02", "8"), work("b", "2024-02-02", "8")],
            &[],
            &first_week(),
            &HolidayCalendar::default(),
        );
        assert!(views.daily.contains_key("a"));
        assert!(!views.daily.contains_key("b"));
    }

    #[test]
    fn test_ordered_by_follows_summary() {
        let views = expand_details(
            &[work("a", "2024-01-02", "8"), work("b", "2024-01-02", "8")],
            &[],
            &first_week(),
            &HolidayCalendar::default(),
        );
        let summary = |key: &str| PersonSummary {
            person_key: key.to_string(),
            display_name: key.to_string(),
            employee_id: None,
            earliest_date: None,
            latest_date: None,
            total_duration_hours: Decimal::ZERO,
            mandays: Decimal::ZERO,
            overtime: Decimal::ZERO,
            leave_paid: Decimal::ZERO,
            leave_unpaid: Decimal::ZERO,
            leave_illness: Decimal::ZERO,
            unassigned_time: Decimal::ZERO,
            unassigned_count: 0,
            warnings: Vec::new(),
        };

        let (daily, overtime) = views.ordered_by(&[summary("b")]);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].person_key, "b");
        assert_eq!(overtime[0].person_key, "b");
    }
}
