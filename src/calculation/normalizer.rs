//! Row normalization.
//!
//! Resolves the differences between source schemas up front so the rest of
//! the pipeline only ever sees [`NormalizedEntry`]. A row that cannot be
//! normalized is dropped, logged and counted; it never fails the run.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use crate::config::{LeaveColumns, LeaveLabels, ProgressColumns};
use crate::models::{
    DropReason, EntrySource, LeaveKind, NormalizedEntry, RawRow, RawValue, RunDiagnostics,
};

/// Textual date formats accepted in date cells, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d %b %Y", "%d %B %Y"];

/// Largest spreadsheet serial day number (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Who a row belongs to.
///
/// The key favours the employee ID and falls back to the full name; both are
/// case-folded so that matching across sources ignores casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonIdentity {
    /// Case-folded grouping key.
    pub person_key: String,
    /// `"{first} {last}"` as exported, possibly empty.
    pub display_name: String,
    /// The employee ID as exported.
    pub employee_id: Option<String>,
}

impl PersonIdentity {
    /// Resolves an identity from the optional ID and name parts.
    ///
    /// Returns `None` when there is neither an ID nor a name.
    ///
    /// # Example
    ///
    /// ```
    /// use manday_engine::calculation::PersonIdentity;
    ///
    /// let by_id = PersonIdentity::resolve(Some("EMP-7".into()), Some("Ada".into()), None).unwrap();
    /// assert_eq!(by_id.person_key, "emp-7");
    ///
    /// let by_name = PersonIdentity::resolve(None, Some("Ada".into()), Some("Lovelace".into())).unwrap();
    /// assert_eq!(by_name.person_key, "ada lovelace");
    /// assert_eq!(by_name.display_name, "Ada Lovelace");
    /// ```
    pub fn resolve(
        employee_id: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Option<Self> {
        let display_name = [first_name, last_name]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let person_key = match &employee_id {
            Some(id) => id.to_lowercase(),
            None if !display_name.is_empty() => fold_name(&display_name),
            None => return None,
        };

        Some(Self {
            person_key,
            display_name,
            employee_id,
        })
    }
}

/// Case-folds a name and collapses inner whitespace.
pub fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parses a date cell.
///
/// Accepts ISO (`2024-01-02`), day/month/year (`02/01/2024`), header forms
/// (`02 Jan 2024`, `02 January 2024`), datetimes whose first ten characters
/// are one of the first two forms, and spreadsheet serial day numbers.
///
/// # Example
///
/// ```
/// use manday_engine::calculation::parse_date;
/// use manday_engine::models::RawValue;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
/// assert_eq!(parse_date(&RawValue::from("2024-01-02")), expected);
/// assert_eq!(parse_date(&RawValue::from("02/01/2024")), expected);
/// assert_eq!(parse_date(&RawValue::from("2 Jan 2024")), expected);
/// assert_eq!(parse_date(&RawValue::Number(45293.0)), expected);
/// assert_eq!(parse_date(&RawValue::from("next tuesday")), None);
/// ```
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Number(serial) => from_serial_day(*serial),
        RawValue::Text(text) => parse_date_text(text.trim()),
        RawValue::Empty => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            let prefix = text.get(..10)?;
            DATE_FORMATS[..2]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(prefix, format).ok())
        })
}

fn from_serial_day(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    // Serial day 1 is 1900-01-01 counting the phantom 1900-02-29.
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Parses a duration cell as a decimal.
///
/// Missing, blank and non-numeric cells read as zero.
pub fn parse_hours(value: Option<&RawValue>) -> Decimal {
    match value {
        Some(RawValue::Number(n)) => Decimal::from_f64(*n).unwrap_or(Decimal::ZERO),
        Some(RawValue::Text(s)) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        Some(RawValue::Empty) | None => Decimal::ZERO,
    }
}

fn cell_text(row: &RawRow, column: &str) -> Option<String> {
    row.get(column).and_then(RawValue::text)
}

/// Normalizes progress export rows.
///
/// A progress row whose activity is a configured unassigned label becomes a
/// leave entry of kind [`LeaveKind::Unassigned`].
pub fn normalize_progress(
    rows: &[RawRow],
    columns: &ProgressColumns,
    labels: &LeaveLabels,
    diagnostics: &mut RunDiagnostics,
) -> Vec<NormalizedEntry> {
    diagnostics.progress_rows_read += rows.len();
    rows.iter()
        .enumerate()
        .filter_map(
            |(index, row)| match normalize_progress_row(row, columns, labels) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    debug!(source = "progress", row = index, reason = %reason, "Dropped row");
                    diagnostics.record_drop(reason);
                    None
                }
            },
        )
        .collect()
}

fn normalize_progress_row(
    row: &RawRow,
    columns: &ProgressColumns,
    labels: &LeaveLabels,
) -> Result<NormalizedEntry, DropReason> {
    let date = row
        .get(&columns.date)
        .and_then(parse_date)
        .ok_or(DropReason::UnparseableDate)?;

    let duration_hours = parse_hours(row.get(&columns.duration));
    if duration_hours <= Decimal::ZERO {
        return Err(DropReason::NonPositiveDuration);
    }

    let person = PersonIdentity::resolve(
        cell_text(row, &columns.employee_id),
        cell_text(row, &columns.first_name),
        cell_text(row, &columns.last_name),
    )
    .ok_or(DropReason::MissingPerson)?;

    let activity_label = cell_text(row, &columns.activity);
    let unassigned = activity_label
        .as_deref()
        .is_some_and(|activity| labels.is_unassigned(activity));

    Ok(NormalizedEntry {
        person_key: person.person_key,
        person_display_name: person.display_name,
        employee_id: person.employee_id,
        date,
        duration_hours,
        source: if unassigned {
            EntrySource::Leave
        } else {
            EntrySource::Work
        },
        leave_kind: unassigned.then_some(LeaveKind::Unassigned),
        leave_label: if unassigned {
            activity_label.clone()
        } else {
            None
        },
        activity_label,
    })
}

/// Normalizes keyed leave export rows.
pub fn normalize_leave(
    rows: &[RawRow],
    columns: &LeaveColumns,
    labels: &LeaveLabels,
    diagnostics: &mut RunDiagnostics,
) -> Vec<NormalizedEntry> {
    diagnostics.leave_rows_read += rows.len();
    rows.iter()
        .enumerate()
        .filter_map(
            |(index, row)| match normalize_leave_row(row, columns, labels) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    debug!(source = "leave", row = index, reason = %reason, "Dropped row");
                    diagnostics.record_drop(reason);
                    None
                }
            },
        )
        .collect()
}

fn normalize_leave_row(
    row: &RawRow,
    columns: &LeaveColumns,
    labels: &LeaveLabels,
) -> Result<NormalizedEntry, DropReason> {
    let date = row
        .get(&columns.date)
        .and_then(parse_date)
        .ok_or(DropReason::UnparseableDate)?;

    let duration_hours = columns
        .duration_unit
        .to_hours(parse_hours(row.get(&columns.duration)));
    if duration_hours <= Decimal::ZERO {
        return Err(DropReason::NonPositiveDuration);
    }

    let person = PersonIdentity::resolve(
        cell_text(row, &columns.employee_id),
        cell_text(row, &columns.first_name),
        cell_text(row, &columns.last_name),
    )
    .ok_or(DropReason::MissingPerson)?;

    let leave_label = cell_text(row, &columns.leave_type).ok_or(DropReason::MissingLeaveType)?;
    let leave_kind = labels.classify(&leave_label);

    Ok(NormalizedEntry {
        person_key: person.person_key,
        person_display_name: person.display_name,
        employee_id: person.employee_id,
        date,
        duration_hours,
        source: EntrySource::Leave,
        leave_kind,
        leave_label: Some(leave_label),
        activity_label: None,
    })
}
