//! The reconciliation pipeline.
//!
//! One synchronous pass over already-acquired rows:
//! normalize → filter to range → resolve leave → aggregate → expand.
//! The holiday lookup happens first and is the only step allowed to fail
//! softly.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, info};

use super::aggregator::aggregate;
use super::detail_expander::expand_details;
use super::leave_matrix::{KnownPeople, normalize_leave_matrix};
use super::leave_resolver::resolve_leave;
use super::normalizer::{normalize_leave, normalize_progress};
use crate::config::SchemaConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DateRange, DropReason, NormalizedEntry, PersonSummary, RawRow, Report, RunDiagnostics,
    SchemaKind, SummarySort,
};
use crate::sources::{HolidayProvider, resolve_holidays};

/// Everything a run needs besides configuration.
#[derive(Debug, Clone)]
pub struct ReconcileInput {
    /// The inclusive reporting range.
    pub range: DateRange,
    /// Rows of the progress export.
    pub progress_rows: Vec<RawRow>,
    /// Rows of the leave export.
    pub leave_rows: Vec<RawRow>,
    /// Layout of `leave_rows`: [`SchemaKind::Leave`] or [`SchemaKind::LeaveMatrix`].
    pub leave_schema: SchemaKind,
    /// Summary ordering.
    pub sort: SummarySort,
    /// Case-insensitive substring matched against display name and key.
    pub name_filter: Option<String>,
}

impl ReconcileInput {
    /// Creates an input with keyed leave rows, default ordering and no filter.
    pub fn new(range: DateRange, progress_rows: Vec<RawRow>, leave_rows: Vec<RawRow>) -> Self {
        Self {
            range,
            progress_rows,
            leave_rows,
            leave_schema: SchemaKind::Leave,
            sort: SummarySort::default(),
            name_filter: None,
        }
    }

    /// Sets the leave row layout.
    pub fn with_leave_schema(mut self, leave_schema: SchemaKind) -> Self {
        self.leave_schema = leave_schema;
        self
    }

    /// Sets the summary ordering.
    pub fn with_sort(mut self, sort: SummarySort) -> Self {
        self.sort = sort;
        self
    }

    /// Narrows the summary to matching people.
    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = Some(filter.into());
        self
    }
}

/// Runs a full reconciliation.
///
/// # Errors
///
/// Returns [`EngineError::UnreadableSource`] when `leave_schema` is
/// [`SchemaKind::Progress`]. Bad rows and a failed holiday lookup never
/// fail the run; they are tallied in [`Report::diagnostics`].
///
/// # Example
///
/// ```
/// use manday_engine::calculation::{ReconcileInput, reconcile};
/// use manday_engine::config::SchemaConfig;
/// use manday_engine::models::{DateRange, RawRow};
/// use manday_engine::sources::NoHolidays;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
/// ).unwrap();
/// let progress = vec![RawRow::new()
///     .with("Date", "2024-01-02")
///     .with("Duration", 8.0)
///     .with("Firstname", "Ada")
///     .with("Lastname", "Lovelace")
///     .with("EmployeeID", "E-1")];
///
/// let input = ReconcileInput::new(range, progress, Vec::new());
/// let report = reconcile(&input, &SchemaConfig::default(), &NoHolidays).unwrap();
///
/// let ada = report.person("e-1").unwrap();
/// assert_eq!(ada.mandays, Decimal::ONE);
/// assert_eq!(report.daily_for("e-1").unwrap().days.len(), 3);
/// ```
pub fn reconcile(
    input: &ReconcileInput,
    schemas: &SchemaConfig,
    holidays: &dyn HolidayProvider,
) -> EngineResult<Report> {
    if input.leave_schema == SchemaKind::Progress {
        return Err(EngineError::UnreadableSource {
            source_name: "leave".to_string(),
            message: "leave rows cannot use the progress schema".to_string(),
        });
    }

    let started = Instant::now();
    let range = &input.range;
    let mut diagnostics = RunDiagnostics::default();

    let calendar = resolve_holidays(holidays, range, &mut diagnostics);

    let progress = normalize_progress(
        &input.progress_rows,
        &schemas.progress,
        &schemas.labels,
        &mut diagnostics,
    );
    let leave = match input.leave_schema {
        SchemaKind::LeaveMatrix => normalize_leave_matrix(
            &input.leave_rows,
            &schemas.leave_matrix,
            &schemas.labels,
            &KnownPeople::from_entries(&progress),
            &mut diagnostics,
        ),
        _ => normalize_leave(
            &input.leave_rows,
            &schemas.leave,
            &schemas.labels,
            &mut diagnostics,
        ),
    };

    let progress_people: BTreeSet<String> =
        progress.iter().map(|e| e.person_key.clone()).collect();

    let progress = retain_in_range(progress, range, &mut diagnostics);
    let leave = retain_in_range(leave, range, &mut diagnostics);

    let resolution = resolve_leave(&leave);
    diagnostics.masked_leave_entries = resolution.masked_entries;
    diagnostics.unmatched_leave_entries = resolution
        .index
        .iter()
        .filter(|e| !progress_people.contains(&e.person_key))
        .count();

    let aggregation = aggregate(&progress, &resolution.index, range, &calendar);
    diagnostics.suppressed_work_entries = aggregation.suppressed_work_entries;

    let mut summary: Vec<PersonSummary> = aggregation
        .people
        .into_values()
        .map(|person| person.finalize())
        .filter(|row| matches_filter(row, input.name_filter.as_deref()))
        .collect();
    input.sort.apply(&mut summary);

    let (daily, overtime) =
        expand_details(&progress, &leave, range, &calendar).ordered_by(&summary);

    // unassigned time arrives through the progress export
    let mut leave_audit: Vec<NormalizedEntry> = leave
        .into_iter()
        .chain(progress.into_iter().filter(NormalizedEntry::is_leave))
        .collect();
    leave_audit.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.person_key.cmp(&b.person_key))
    });

    info!(
        people = summary.len(),
        progress_rows = diagnostics.progress_rows_read,
        leave_rows = diagnostics.leave_rows_read,
        dropped = diagnostics.dropped_total(),
        holiday_lookup_failed = diagnostics.holiday_lookup_failed,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Reconciliation complete"
    );

    Ok(Report {
        start_date: range.start_date(),
        end_date: range.end_date(),
        summary,
        daily,
        overtime,
        leave_audit,
        diagnostics,
    })
}

fn retain_in_range(
    entries: Vec<NormalizedEntry>,
    range: &DateRange,
    diagnostics: &mut RunDiagnostics,
) -> Vec<NormalizedEntry> {
    let before = entries.len();
    let kept: Vec<NormalizedEntry> = entries
        .into_iter()
        .filter(|e| range.contains_date(e.date))
        .collect();
    for _ in kept.len()..before {
        diagnostics.record_drop(DropReason::OutOfRange);
    }
    if kept.len() < before {
        debug!(dropped = before - kept.len(), "Dropped entries outside range");
    }
    kept
}

fn matches_filter(row: &PersonSummary, filter: Option<&str>) -> bool {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return true;
    };
    let needle = filter.to_lowercase();
    row.display_name.to_lowercase().contains(&needle) || row.person_key.contains(&needle)
}
