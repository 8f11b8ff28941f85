//! Calendar classification.
//!
//! Decides whether a date is a weekend and whether it is a public holiday.
//! The two predicates are independent: a holiday falling on a Saturday is
//! both, and callers combine them with OR.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

/// Classifies calendar days for the aggregator and detail expander.
pub trait DayClassifier {
    /// Returns true for Saturdays and Sundays.
    fn is_weekend(&self, date: NaiveDate) -> bool {
        is_weekend(date)
    }

    /// Returns true for public holidays.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Returns true when worked time on `date` counts as overtime instead of
    /// mandays.
    fn is_overtime_day(&self, date: NaiveDate) -> bool {
        self.is_weekend(date) || self.is_holiday(date)
    }
}

/// Returns true for Saturdays and Sundays.
///
/// # Example
///
/// ```
/// use manday_engine::calculation::is_weekend;
/// use chrono::NaiveDate;
///
/// // 2024-01-06 is a Saturday
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
/// // 2024-01-08 is a Monday
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A set of public holiday dates.
///
/// # Example
///
/// ```
/// use manday_engine::calculation::{DayClassifier, HolidayCalendar};
/// use chrono::NaiveDate;
///
/// let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
/// let calendar = HolidayCalendar::new([christmas]);
///
/// assert!(calendar.is_holiday(christmas));
/// assert!(calendar.is_overtime_day(christmas));
/// assert!(!calendar.is_weekend(christmas));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates a calendar from holiday dates. Duplicates collapse.
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Number of distinct holiday dates.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Returns true when there are no holidays.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl DayClassifier for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}
