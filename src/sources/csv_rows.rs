//! CSV row acquisition.
//!
//! Keyed schemas use the header record for column names. The leave matrix is
//! read headerless since its header rows are part of the layout.

use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{RawRow, RawValue, SchemaKind};

/// Reads every row of a CSV export.
///
/// Cells are kept as text; interpreting numbers and dates is the
/// normalizer's job.
///
/// # Errors
///
/// Returns [`EngineError::UnreadableSource`] when the data is not valid CSV or
/// UTF-8, or when a keyed schema has no header row.
///
/// # Example
///
/// ```
/// use manday_engine::models::{RawValue, SchemaKind};
/// use manday_engine::sources::read_csv;
///
/// let data = "Date,Duration\n2024-01-02,8\n";
/// let rows = read_csv(data.as_bytes(), "progress.csv", SchemaKind::Progress).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].get("Duration"), Some(&RawValue::from("8")));
/// ```
pub fn read_csv<R: Read>(
    reader: R,
    source_name: &str,
    schema: SchemaKind,
) -> EngineResult<Vec<RawRow>> {
    let positional = schema == SchemaKind::LeaveMatrix;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(!positional)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    if positional {
        for record in reader.records() {
            let record = record.map_err(|e| unreadable(source_name, e))?;
            rows.push(RawRow::from_positional(record.iter().map(cell)));
        }
    } else {
        let headers = reader
            .headers()
            .map_err(|e| unreadable(source_name, e))?
            .clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(unreadable(source_name, "no header row"));
        }
        for record in reader.records() {
            let record = record.map_err(|e| unreadable(source_name, e))?;
            rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, value)| (header.to_string(), cell(value)))
                    .collect(),
            );
        }
    }

    debug!(
        source = source_name,
        schema = %schema,
        rows = rows.len(),
        "Read CSV source"
    );
    Ok(rows)
}

/// Opens and reads a CSV export from disk.
pub fn read_csv_file<P: AsRef<Path>>(path: P, schema: SchemaKind) -> EngineResult<Vec<RawRow>> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| unreadable(&source_name, e))?;
    read_csv(file, &source_name, schema)
}

fn cell(value: &str) -> RawValue {
    if value.trim().is_empty() {
        RawValue::Empty
    } else {
        RawValue::Text(value.to_string())
    }
}

fn unreadable(source_name: &str, error: impl Display) -> EngineError {
    EngineError::UnreadableSource {
        source_name: source_name.to_string(),
        message: error.to_string(),
    }
}
