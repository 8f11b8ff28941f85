//! Normalized entry model.
//!
//! Every source schema is resolved into [`NormalizedEntry`] by the normalizer,
//! so nothing downstream needs to know which export a row came from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which stream an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Worked time from the progress export.
    Work,
    /// Absence, or leave-like time such as unassigned hours.
    Leave,
}

/// Categorical classification of an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    /// Paid leave. Any leave label that is not otherwise classified.
    Paid,
    /// Unpaid leave.
    Unpaid,
    /// Sick leave.
    Illness,
    /// Hours logged against no billable activity.
    Unassigned,
}

impl LeaveKind {
    /// Resolution priority when several kinds land on the same person-day.
    ///
    /// Higher wins: unassigned, then unpaid, then illness, then paid.
    ///
    /// # Example
    ///
    /// ```
    /// use manday_engine::models::LeaveKind;
    ///
    /// assert!(LeaveKind::Unassigned.priority() > LeaveKind::Unpaid.priority());
    /// assert!(LeaveKind::Illness.priority() > LeaveKind::Paid.priority());
    /// ```
    pub fn priority(self) -> u8 {
        match self {
            LeaveKind::Unassigned => 3,
            LeaveKind::Unpaid => 2,
            LeaveKind::Illness => 1,
            LeaveKind::Paid => 0,
        }
    }
}

impl std::fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveKind::Paid => write!(f, "Paid"),
            LeaveKind::Unpaid => write!(f, "Unpaid"),
            LeaveKind::Illness => write!(f, "Illness"),
            LeaveKind::Unassigned => write!(f, "Unassigned"),
        }
    }
}

/// One person-day contribution in canonical shape.
///
/// `person_key` is the case-folded employee ID when the source carries one,
/// else the case-folded full name. `person_display_name` keeps the source
/// casing for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// Stable grouping key.
    pub person_key: String,
    /// Name for display, `"{first} {last}"` as exported.
    pub person_display_name: String,
    /// The employee ID as exported, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// The calendar day the entry applies to.
    pub date: NaiveDate,
    /// Hours, always strictly positive.
    pub duration_hours: Decimal,
    /// Work or leave.
    pub source: EntrySource,
    /// Set for every leave entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_kind: Option<LeaveKind>,
    /// The leave type label as exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_label: Option<String>,
    /// The activity label of a progress row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_label: Option<String>,
}

impl NormalizedEntry {
    /// Returns true for leave entries.
    pub fn is_leave(&self) -> bool {
        self.source == EntrySource::Leave
    }

    /// The leave kind, treating an unclassified leave entry as paid.
    pub fn effective_leave_kind(&self) -> Option<LeaveKind> {
        match self.source {
            EntrySource::Work => None,
            EntrySource::Leave => Some(self.leave_kind.unwrap_or(LeaveKind::Paid)),
        }
    }
}
