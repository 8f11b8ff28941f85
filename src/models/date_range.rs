//! Reporting range and public holiday models.
//!
//! This module contains the [`DateRange`] and [`PublicHoliday`] types that bound
//! a reconciliation run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a public holiday.
///
/// # Example
///
/// ```
/// use manday_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
///     name: "Christmas Day".to_string(),
///     region: "national".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday (e.g., "Christmas Day").
    pub name: String,
    /// The region where this holiday applies.
    #[serde(default = "default_region")]
    pub region: String,
}

pub(crate) fn default_region() -> String {
    "national".to_string()
}

/// Longest range a run accepts, in days. Detail views are dense over the
/// range, so this bounds their size.
pub const MAX_RANGE_DAYS: i64 = 3_660;

/// An inclusive calendar range `[start_date, end_date]`.
///
/// Construction enforces `start_date <= end_date`, so every `DateRange`
/// covers at least one day and at most [`MAX_RANGE_DAYS`].
///
/// # Example
///
/// ```
/// use manday_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(range.day_count(), 3);
/// assert!(range.contains_date(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting one that ends before it starts or spans
    /// more than [`MAX_RANGE_DAYS`].
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if start_date > end_date {
            return Err(EngineError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        if (end_date - start_date).num_days() >= MAX_RANGE_DAYS {
            return Err(EngineError::DateRangeTooLong {
                start: start_date,
                end: end_date,
                max_days: MAX_RANGE_DAYS,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The first day of the range.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last day of the range.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Checks if a given date falls within this range, both bounds included.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates every date in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |day| *day <= end)
    }

    /// The number of calendar days covered.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
