//! Per-person accumulation and summary models.
//!
//! The aggregator owns one [`PersonAccumulator`] per person while it folds the
//! run. Once the fold completes each accumulator is finalized into an immutable
//! [`PersonSummary`].

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::NormalizedEntry;

/// The kind of data-quality problem attached to a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// No row for the person carried a usable name.
    MissingDisplayName,
    /// Rows for the same key carried different names.
    InconsistentDisplayName,
}

/// A data-quality warning for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    /// A code identifying the type of warning.
    pub code: WarningCode,
    /// A human-readable description of the warning.
    pub message: String,
}

/// Running totals for one person during a single run.
///
/// All quantities except `total_duration_hours` and `unassigned_count` are in
/// mandays.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonAccumulator {
    /// The grouping key.
    pub person_key: String,
    /// First non-empty display name observed.
    pub display_name: Option<String>,
    /// First employee ID observed.
    pub employee_id: Option<String>,
    /// Worked mandays, net of unassigned time, plus paid leave credits.
    pub mandays: Decimal,
    /// Weekend and holiday work.
    pub overtime: Decimal,
    /// Paid leave, one per resolved leave day.
    pub leave_paid: Decimal,
    /// Unpaid leave.
    pub leave_unpaid: Decimal,
    /// Sick leave.
    pub leave_illness: Decimal,
    /// Unassigned time.
    pub unassigned_time: Decimal,
    /// Number of unassigned days.
    pub unassigned_count: u32,
    /// Every counted hour regardless of bucket.
    pub total_duration_hours: Decimal,
    /// Earliest date observed for the person.
    pub earliest_date: Option<NaiveDate>,
    /// Latest date observed for the person.
    pub latest_date: Option<NaiveDate>,
    /// Days already credited to `mandays` from worked time.
    pub covered_dates: BTreeSet<NaiveDate>,
    /// Data-quality problems seen so far.
    pub warnings: Vec<DataQualityWarning>,
}

impl PersonAccumulator {
    /// Creates an empty accumulator for a key.
    pub fn new(person_key: impl Into<String>) -> Self {
        Self {
            person_key: person_key.into(),
            display_name: None,
            employee_id: None,
            mandays: Decimal::ZERO,
            overtime: Decimal::ZERO,
            leave_paid: Decimal::ZERO,
            leave_unpaid: Decimal::ZERO,
            leave_illness: Decimal::ZERO,
            unassigned_time: Decimal::ZERO,
            unassigned_count: 0,
            total_duration_hours: Decimal::ZERO,
            earliest_date: None,
            latest_date: None,
            covered_dates: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Records identity and date span from an entry without touching totals.
    pub fn observe(&mut self, entry: &NormalizedEntry) {
        self.earliest_date = Some(match self.earliest_date {
            Some(current) => current.min(entry.date),
            None => entry.date,
        });
        self.latest_date = Some(match self.latest_date {
            Some(current) => current.max(entry.date),
            None => entry.date,
        });

        if self.employee_id.is_none() {
            self.employee_id = entry.employee_id.clone();
        }

        let name = entry.person_display_name.trim();
        if name.is_empty() {
            return;
        }
        match &self.display_name {
            None => self.display_name = Some(name.to_string()),
            Some(known) if known.eq_ignore_ascii_case(name) => {}
            Some(known) => {
                let already_flagged = self
                    .warnings
                    .iter()
                    .any(|w| w.code == WarningCode::InconsistentDisplayName);
                if !already_flagged {
                    self.warnings.push(DataQualityWarning {
                        code: WarningCode::InconsistentDisplayName,
                        message: format!(
                            "Key '{}' is exported as both '{}' and '{}'",
                            self.person_key, known, name
                        ),
                    });
                }
            }
        }
    }

    /// Projects the accumulator into its reporting form.
    ///
    /// Manday quantities are rounded to two decimals. A person with no usable
    /// name is reported under their key with a warning.
    pub fn finalize(self) -> PersonSummary {
        let mut warnings = self.warnings;
        let display_name = match self.display_name {
            Some(name) => name,
            None => {
                warnings.push(DataQualityWarning {
                    code: WarningCode::MissingDisplayName,
                    message: format!("No display name found for key '{}'", self.person_key),
                });
                self.person_key.clone()
            }
        };

        PersonSummary {
            person_key: self.person_key,
            display_name,
            employee_id: self.employee_id,
            earliest_date: self.earliest_date,
            latest_date: self.latest_date,
            total_duration_hours: round2(self.total_duration_hours),
            mandays: round2(self.mandays),
            overtime: round2(self.overtime),
            leave_paid: round2(self.leave_paid),
            leave_unpaid: round2(self.leave_unpaid),
            leave_illness: round2(self.leave_illness),
            unassigned_time: round2(self.unassigned_time),
            unassigned_count: self.unassigned_count,
            warnings,
        }
    }
}

fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// The reporting projection of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    /// The grouping key.
    pub person_key: String,
    /// Name for display.
    pub display_name: String,
    /// The employee ID, when any source carried one.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Earliest date observed.
    pub earliest_date: Option<NaiveDate>,
    /// Latest date observed.
    pub latest_date: Option<NaiveDate>,
    /// Counted hours across all buckets.
    pub total_duration_hours: Decimal,
    /// Worked mandays.
    pub mandays: Decimal,
    /// Weekend and holiday work in mandays.
    pub overtime: Decimal,
    /// Paid leave in mandays.
    pub leave_paid: Decimal,
    /// Unpaid leave in mandays.
    pub leave_unpaid: Decimal,
    /// Sick leave in mandays.
    pub leave_illness: Decimal,
    /// Unassigned time in mandays.
    pub unassigned_time: Decimal,
    /// Number of unassigned days.
    pub unassigned_count: u32,
    /// Data-quality warnings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

/// Column used to order the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Grouping key (employee ID or folded name).
    #[default]
    PersonKey,
    /// Display name.
    Name,
    /// Worked mandays.
    Mandays,
    /// Total counted hours.
    Duration,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Ordering for the summary table.
///
/// Ties are always broken by ascending person key so the output is stable.
///
/// # Example
///
/// ```
/// use manday_engine::models::{SortDirection, SortKey, SummarySort};
///
/// let sort = SummarySort { key: SortKey::Mandays, direction: SortDirection::Desc };
/// assert_ne!(sort, SummarySort::default());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySort {
    /// The column to sort by.
    #[serde(default)]
    pub key: SortKey,
    /// The direction to sort in.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SummarySort {
    /// Sorts summaries in place.
    pub fn apply(&self, rows: &mut [PersonSummary]) {
        rows.sort_by(|a, b| {
            let primary = match self.key {
                SortKey::PersonKey => a.person_key.cmp(&b.person_key),
                SortKey::Name => a
                    .display_name
                    .to_lowercase()
                    .cmp(&b.display_name.to_lowercase()),
                SortKey::Mandays => a.mandays.cmp(&b.mandays),
                SortKey::Duration => a.total_duration_hours.cmp(&b.total_duration_hours),
            };
            let primary = match self.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            match primary {
                Ordering::Equal => a.person_key.cmp(&b.person_key),
                other => other,
            }
        });
    }
}
