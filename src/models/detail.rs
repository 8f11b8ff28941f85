//! Day-by-day detail models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw hours per day for one person over the full requested range.
///
/// `days` holds exactly one entry per date in the range, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDetail {
    /// The grouping key.
    pub person_key: String,
    /// Name for display.
    pub display_name: String,
    /// The employee ID, when known.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Hours per date, work and leave summed together.
    pub days: BTreeMap<NaiveDate, Decimal>,
    /// Sum of `days`.
    pub total_duration_hours: Decimal,
}

/// Weekend and holiday hours per day for one person, in mandays.
///
/// `days` is dense over the range; ordinary workdays are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeDetail {
    /// The grouping key.
    pub person_key: String,
    /// Name for display.
    pub display_name: String,
    /// The employee ID, when known.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Uncapped `hours / 8` per weekend or holiday date.
    pub days: BTreeMap<NaiveDate, Decimal>,
    /// Sum of `days`.
    pub total_overtime: Decimal,
}

impl OvertimeDetail {
    /// Only the dates that carry overtime, for sparse exports.
    pub fn non_zero_days(&self) -> impl Iterator<Item = (&NaiveDate, &Decimal)> {
        self.days.iter().filter(|(_, value)| !value.is_zero())
    }
}
