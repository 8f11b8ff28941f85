//! Manday aggregation.
//!
//! Folds work entries and the resolved leave index into one
//! [`PersonAccumulator`] per person. The rules, applied per person-day:
//!
//! 1. Exported leave on a day suppresses all progress rows on that day.
//! 2. Leave credits its bucket by kind. Paid leave is a whole manday per day
//!    regardless of duration; the other kinds credit `hours / 8`, capped at 1.
//!    Unassigned time is debited from mandays.
//! 3. Work hours are summed per day and credit `min(hours / 8, 1)`, to
//!    mandays on a workday and to overtime on a weekend or holiday.
//! 4. Unassigned time logged in progress sits beside that day's work and is
//!    debited on its own.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::calendar::DayClassifier;
use super::leave_resolver::LeaveIndex;
use crate::models::{DateRange, LeaveKind, NormalizedEntry, PersonAccumulator};

/// Hours in one manday.
pub const HOURS_PER_MANDAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Converts hours to a manday credit capped at one day.
///
/// # Example
///
/// ```
/// use manday_engine::calculation::capped_manday;
/// use rust_decimal::Decimal;
///
/// assert_eq!(capped_manday(Decimal::from(4)), Decimal::new(5, 1));
/// assert_eq!(capped_manday(Decimal::from(12)), Decimal::ONE);
/// ```
pub fn capped_manday(hours: Decimal) -> Decimal {
    (hours / HOURS_PER_MANDAY).min(Decimal::ONE)
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Accumulators keyed and ordered by person key.
    pub people: BTreeMap<String, PersonAccumulator>,
    /// Progress rows dropped because the person had exported leave that day.
    pub suppressed_work_entries: usize,
}

/// Folds entries into per-person accumulators.
///
/// `progress` may contain leave-sourced entries (unassigned time). Those are
/// debited directly and never suppress work. `leave` must hold only exported
/// leave. Entries outside `range` are ignored.
pub fn aggregate<C: DayClassifier + ?Sized>(
    progress: &[NormalizedEntry],
    leave: &LeaveIndex,
    range: &DateRange,
    calendar: &C,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    // progress is observed first so its display names win over leave exports
    let mut worked: BTreeMap<(&str, NaiveDate), Decimal> = BTreeMap::new();
    for entry in progress.iter().filter(|e| range.contains_date(e.date)) {
        let person = accumulator(&mut aggregation.people, entry);
        person.observe(entry);

        if leave.contains(&entry.person_key, entry.date) {
            aggregation.suppressed_work_entries += 1;
            continue;
        }
        if entry.is_leave() {
            debit_unassigned(person, entry.duration_hours);
            continue;
        }
        *worked
            .entry((entry.person_key.as_str(), entry.date))
            .or_default() += entry.duration_hours;
    }

    for entry in leave.iter().filter(|e| range.contains_date(e.date)) {
        let person = accumulator(&mut aggregation.people, entry);
        person.observe(entry);
        credit_leave(person, entry);
    }

    for ((person_key, date), hours) in worked {
        let Some(person) = aggregation.people.get_mut(person_key) else {
            continue;
        };
        let credit = capped_manday(hours);
        if calendar.is_overtime_day(date) {
            person.overtime += credit;
        } else if person.covered_dates.insert(date) {
            person.mandays += credit;
        }
        person.total_duration_hours += hours;
    }

    debug!(
        people = aggregation.people.len(),
        suppressed = aggregation.suppressed_work_entries,
        "Aggregated entries"
    );
    aggregation
}

fn accumulator<'a>(
    people: &'a mut BTreeMap<String, PersonAccumulator>,
    entry: &NormalizedEntry,
) -> &'a mut PersonAccumulator {
    people
        .entry(entry.person_key.clone())
        .or_insert_with(|| PersonAccumulator::new(entry.person_key.clone()))
}

fn credit_leave(person: &mut PersonAccumulator, entry: &NormalizedEntry) {
    let credit = match entry.effective_leave_kind() {
        Some(LeaveKind::Paid) | None => {
            person.leave_paid += Decimal::ONE;
            person.mandays += Decimal::ONE;
            Decimal::ONE
        }
        Some(LeaveKind::Unpaid) => {
            let credit = capped_manday(entry.duration_hours);
            person.leave_unpaid += credit;
            credit
        }
        Some(LeaveKind::Illness) => {
            let credit = capped_manday(entry.duration_hours);
            person.leave_illness += credit;
            credit
        }
        Some(LeaveKind::Unassigned) => {
            debit_unassigned(person, entry.duration_hours);
            return;
        }
    };
    person.covered_dates.insert(entry.date);
    person.total_duration_hours += credit * HOURS_PER_MANDAY;
}

fn debit_unassigned(person: &mut PersonAccumulator, hours: Decimal) {
    let debit = capped_manday(hours);
    person.unassigned_time += debit;
    person.unassigned_count += 1;
    person.mandays -= debit;
    person.total_duration_hours += debit * HOURS_PER_MANDAY;
}
