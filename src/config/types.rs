//! Configuration types for source schemas.
//!
//! These structures are deserialized from `schemas.yaml`. Every field has a
//! default matching the column names of the usual exports, so a partial file
//! only needs to list what differs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LeaveKind;

/// Unit of a duration column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    /// Durations are hours.
    #[default]
    Hours,
    /// Durations are days of eight hours.
    Days,
}

impl DurationUnit {
    /// Converts a duration in this unit to hours.
    pub fn to_hours(self, value: Decimal) -> Decimal {
        match self {
            DurationUnit::Hours => value,
            DurationUnit::Days => value * Decimal::from(8),
        }
    }
}

/// Column names of the progress export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressColumns {
    /// Date column.
    pub date: String,
    /// Hours column.
    pub duration: String,
    /// First name column.
    pub first_name: String,
    /// Last name column.
    pub last_name: String,
    /// Employee ID column.
    pub employee_id: String,
    /// Activity label column.
    pub activity: String,
}

impl Default for ProgressColumns {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            duration: "Duration".to_string(),
            first_name: "Firstname".to_string(),
            last_name: "Lastname".to_string(),
            employee_id: "EmployeeID".to_string(),
            activity: "ActivityName".to_string(),
        }
    }
}

/// Column names of the keyed leave export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveColumns {
    /// Date column.
    pub date: String,
    /// Duration column.
    pub duration: String,
    /// Unit of the duration column.
    pub duration_unit: DurationUnit,
    /// First name column.
    pub first_name: String,
    /// Last name column.
    pub last_name: String,
    /// Employee ID column.
    pub employee_id: String,
    /// Leave type column.
    pub leave_type: String,
}

impl Default for LeaveColumns {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            duration: "length_hours".to_string(),
            duration_unit: DurationUnit::Hours,
            first_name: "emp_firstname".to_string(),
            last_name: "emp_lastname".to_string(),
            employee_id: "employee_id".to_string(),
            leave_type: "name".to_string(),
        }
    }
}

/// Positions within the leave matrix export. All indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixLayout {
    /// Row holding the date headers.
    pub date_header_row: usize,
    /// First row of person blocks.
    pub first_data_row: usize,
    /// First column holding a date.
    pub first_date_column: usize,
    /// Unit of the duration cells.
    pub duration_unit: DurationUnit,
}

impl Default for MatrixLayout {
    fn default() -> Self {
        Self {
            date_header_row: 1,
            first_data_row: 2,
            first_date_column: 1,
            duration_unit: DurationUnit::Hours,
        }
    }
}

/// Labels that select a leave kind. Anything else non-empty is paid leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveLabels {
    /// Labels for unassigned time, matched against leave types and activities.
    pub unassigned: Vec<String>,
    /// Labels for unpaid leave.
    pub unpaid: Vec<String>,
    /// Labels for sick leave.
    pub illness: Vec<String>,
}

impl Default for LeaveLabels {
    fn default() -> Self {
        Self {
            unassigned: vec!["Un-assigned Time".to_string()],
            unpaid: vec!["Leave (UNPAID)".to_string()],
            illness: vec!["Illness".to_string()],
        }
    }
}

impl LeaveLabels {
    /// Classifies a leave type label, or `None` when it is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use manday_engine::config::LeaveLabels;
    /// use manday_engine::models::LeaveKind;
    ///
    /// let labels = LeaveLabels::default();
    /// assert_eq!(labels.classify("illness "), Some(LeaveKind::Illness));
    /// assert_eq!(labels.classify("Annual Leave"), Some(LeaveKind::Paid));
    /// assert_eq!(labels.classify(""), None);
    /// ```
    pub fn classify(&self, label: &str) -> Option<LeaveKind> {
        let label = label.trim();
        if label.is_empty() {
            None
        } else if matches_any(&self.unassigned, label) {
            Some(LeaveKind::Unassigned)
        } else if matches_any(&self.unpaid, label) {
            Some(LeaveKind::Unpaid)
        } else if matches_any(&self.illness, label) {
            Some(LeaveKind::Illness)
        } else {
            Some(LeaveKind::Paid)
        }
    }

    /// Returns true when an activity label marks unassigned time.
    pub fn is_unassigned(&self, label: &str) -> bool {
        matches_any(&self.unassigned, label.trim())
    }

    /// Returns true when a label appears in any configured list.
    pub fn is_known(&self, label: &str) -> bool {
        let label = label.trim();
        matches_any(&self.unassigned, label)
            || matches_any(&self.unpaid, label)
            || matches_any(&self.illness, label)
    }
}

fn matches_any(labels: &[String], label: &str) -> bool {
    labels.iter().any(|l| l.trim().eq_ignore_ascii_case(label))
}

/// Schema configuration for all source exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Progress export columns.
    pub progress: ProgressColumns,
    /// Keyed leave export columns.
    pub leave: LeaveColumns,
    /// Leave matrix positions.
    pub leave_matrix: MatrixLayout,
    /// Leave kind labels.
    pub labels: LeaveLabels,
}
