//! Report and run diagnostics models.
//!
//! A [`Report`] is the complete output of one reconciliation run and is what
//! report consumers render or export.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DailyDetail, NormalizedEntry, OvertimeDetail, PersonSummary};

/// Why a row was left out of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The date cell matched none of the accepted formats.
    UnparseableDate,
    /// The duration was missing, non-numeric, zero or negative.
    NonPositiveDuration,
    /// Neither an employee ID nor a name was present.
    MissingPerson,
    /// A leave row had no leave type.
    MissingLeaveType,
    /// The date falls outside the requested range.
    OutOfRange,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::UnparseableDate => write!(f, "unparseable date"),
            DropReason::NonPositiveDuration => write!(f, "non-positive duration"),
            DropReason::MissingPerson => write!(f, "missing person"),
            DropReason::MissingLeaveType => write!(f, "missing leave type"),
            DropReason::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Run-level tally of everything that was recovered rather than reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Progress rows handed to the normalizer.
    pub progress_rows_read: usize,
    /// Leave rows handed to the normalizer.
    pub leave_rows_read: usize,
    /// Dropped rows by reason.
    pub dropped_rows: BTreeMap<DropReason, usize>,
    /// Progress rows hidden by exported leave on the same person-day.
    pub suppressed_work_entries: usize,
    /// Leave entries that lost to a higher-priority kind on the same day.
    pub masked_leave_entries: usize,
    /// Resolved leave days for people absent from the progress data.
    pub unmatched_leave_entries: usize,
    /// Leave matrix rows that belonged to no recognised person.
    pub unmatched_leave_rows: usize,
    /// True when the holiday lookup failed and an empty set was used.
    pub holiday_lookup_failed: bool,
}

impl RunDiagnostics {
    /// Counts one dropped row.
    pub fn record_drop(&mut self, reason: DropReason) {
        *self.dropped_rows.entry(reason).or_insert(0) += 1;
    }

    /// Dropped rows for one reason.
    pub fn dropped(&self, reason: DropReason) -> usize {
        self.dropped_rows.get(&reason).copied().unwrap_or(0)
    }

    /// Dropped rows for all reasons.
    pub fn dropped_total(&self) -> usize {
        self.dropped_rows.values().sum()
    }
}

/// The complete output of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// One row per person.
    pub summary: Vec<PersonSummary>,
    /// Raw hours per day, in summary order.
    pub daily: Vec<DailyDetail>,
    /// Weekend and holiday work per day, in summary order.
    pub overtime: Vec<OvertimeDetail>,
    /// Every in-range leave entry before resolution.
    pub leave_audit: Vec<NormalizedEntry>,
    /// Recovered problems.
    pub diagnostics: RunDiagnostics,
}

impl Report {
    /// Finds a person's summary row by key.
    pub fn person(&self, person_key: &str) -> Option<&PersonSummary> {
        self.summary.iter().find(|s| s.person_key == person_key)
    }

    /// Finds a person's daily detail by key.
    pub fn daily_for(&self, person_key: &str) -> Option<&DailyDetail> {
        self.daily.iter().find(|d| d.person_key == person_key)
    }

    /// Finds a person's overtime detail by key.
    pub fn overtime_for(&self, person_key: &str) -> Option<&OvertimeDetail> {
        self.overtime.iter().find(|d| d.person_key == person_key)
    }
}
