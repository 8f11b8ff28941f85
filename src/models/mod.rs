//! Core data models for the manday engine.
//!
//! Raw rows come in, normalized entries flow through the pipeline, and the
//! report with its summaries and detail matrices comes out.

mod date_range;
mod detail;
mod entry;
mod raw_row;
mod report;
mod summary;

pub use date_range::{DateRange, MAX_RANGE_DAYS, PublicHoliday};
pub use detail::{DailyDetail, OvertimeDetail};
pub use entry::{EntrySource, LeaveKind, NormalizedEntry};
pub use raw_row::{RawRow, RawValue, SchemaKind};
pub use report::{DropReason, Report, RunDiagnostics};
pub use summary::{
    DataQualityWarning, PersonAccumulator, PersonSummary, SortDirection, SortKey, SummarySort,
    WarningCode,
};
