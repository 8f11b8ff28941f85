//! Leave matrix normalization.
//!
//! The matrix export is a grid: one header row of dates, then a block per
//! person. A block opens with a row whose first cell names a known person and
//! continues with one row per leave type until a blank first cell or the next
//! known person.
//!
//! ```text
//! Leave report
//!               | 01 Jan 2024 | 02 Jan 2024 | Total
//! Ada Lovelace  |             |             |
//! Illness       | 8           |             | 8
//! Annual Leave  |             | 4           | 4
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::normalizer::{PersonIdentity, fold_name, parse_date, parse_hours};
use crate::config::{LeaveLabels, MatrixLayout};
use crate::models::{DropReason, EntrySource, NormalizedEntry, RawRow, RawValue, RunDiagnostics};

/// People that a matrix person header may name.
///
/// Built from the progress entries: a header matches on the case-folded
/// display name or on the person key.
#[derive(Debug, Clone, Default)]
pub struct KnownPeople {
    by_name: BTreeMap<String, PersonIdentity>,
}

impl KnownPeople {
    /// Collects the people appearing in `entries`. The first identity seen
    /// for a name wins.
    pub fn from_entries(entries: &[NormalizedEntry]) -> Self {
        let mut by_name = BTreeMap::new();
        for entry in entries {
            let identity = PersonIdentity {
                person_key: entry.person_key.clone(),
                display_name: entry.person_display_name.clone(),
                employee_id: entry.employee_id.clone(),
            };
            let folded = fold_name(&entry.person_display_name);
            if !folded.is_empty() {
                by_name.entry(folded).or_insert_with(|| identity.clone());
            }
            by_name.entry(entry.person_key.clone()).or_insert(identity);
        }
        Self { by_name }
    }

    /// Finds the person a header cell names.
    pub fn lookup(&self, name: &str) -> Option<&PersonIdentity> {
        self.by_name.get(&fold_name(name))
    }

    /// Number of distinct names and keys.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true when no people are known.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// One person's block: leave type label → indices of the rows carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixBlock {
    /// The person the block belongs to.
    pub person: PersonIdentity,
    /// Row indices per leave type label, in source order.
    pub leave_rows: BTreeMap<String, Vec<usize>>,
}

/// Splits the data rows into person blocks.
///
/// Rows outside any block are counted as unmatched.
pub fn group_blocks(
    rows: &[RawRow],
    layout: &MatrixLayout,
    labels: &LeaveLabels,
    known: &KnownPeople,
    diagnostics: &mut RunDiagnostics,
) -> Vec<MatrixBlock> {
    let mut blocks: Vec<MatrixBlock> = Vec::new();
    let mut open = false;

    for (index, row) in rows.iter().enumerate().skip(layout.first_data_row) {
        let Some(first_cell) = row.at(0).and_then(RawValue::text) else {
            open = false;
            continue;
        };

        if !labels.is_known(&first_cell) {
            if let Some(person) = known.lookup(&first_cell) {
                blocks.push(MatrixBlock {
                    person: person.clone(),
                    leave_rows: BTreeMap::new(),
                });
                open = true;
                continue;
            }
        }

        match blocks.last_mut() {
            Some(block) if open => block.leave_rows.entry(first_cell).or_default().push(index),
            _ => {
                debug!(
                    row = index,
                    label = %first_cell,
                    "Leave matrix row outside any person block"
                );
                diagnostics.unmatched_leave_rows += 1;
            }
        }
    }

    blocks
}

/// Reads the date header, keeping only columns whose header is a date.
///
/// Total columns and other annotations fall out here.
fn date_columns(rows: &[RawRow], layout: &MatrixLayout) -> Vec<(usize, NaiveDate)> {
    let Some(header) = rows.get(layout.date_header_row) else {
        return Vec::new();
    };
    (layout.first_date_column..header.len())
        .filter_map(|column| {
            header
                .at(column)
                .and_then(parse_date)
                .map(|date| (column, date))
        })
        .collect()
}

/// Normalizes a leave matrix into leave entries.
///
/// Blank cells are skipped; a non-blank cell that does not hold a positive
/// duration is dropped and counted.
pub fn normalize_leave_matrix(
    rows: &[RawRow],
    layout: &MatrixLayout,
    labels: &LeaveLabels,
    known: &KnownPeople,
    diagnostics: &mut RunDiagnostics,
) -> Vec<NormalizedEntry> {
    diagnostics.leave_rows_read += rows.len().saturating_sub(layout.first_data_row);

    let columns = date_columns(rows, layout);
    if columns.is_empty() {
        debug!("Leave matrix has no date header");
    }

    let blocks = group_blocks(rows, layout, labels, known, diagnostics);
    let mut entries = Vec::new();

    for block in &blocks {
        for (label, indices) in &block.leave_rows {
            let leave_kind = labels.classify(label);
            for &index in indices {
                let row = &rows[index];
                for &(column, date) in &columns {
                    let Some(cell) = row.at(column) else {
                        continue;
                    };
                    if cell.is_blank() || is_total_marker(cell) {
                        continue;
                    }
                    let duration_hours = layout.duration_unit.to_hours(parse_hours(Some(cell)));
                    if duration_hours <= Decimal::ZERO {
                        debug!(row = index, column, "Dropped leave matrix cell");
                        diagnostics.record_drop(DropReason::NonPositiveDuration);
                        continue;
                    }
                    entries.push(NormalizedEntry {
                        person_key: block.person.person_key.clone(),
                        person_display_name: block.person.display_name.clone(),
                        employee_id: block.person.employee_id.clone(),
                        date,
                        duration_hours,
                        source: EntrySource::Leave,
                        leave_kind,
                        leave_label: Some(label.clone()),
                        activity_label: None,
                    });
                }
            }
        }
    }

    debug!(
        blocks = blocks.len(),
        entries = entries.len(),
        "Normalized leave matrix"
    );
    entries
}

fn is_total_marker(cell: &RawValue) -> bool {
    cell.text()
        .is_some_and(|text| text.eq_ignore_ascii_case("total"))
}
