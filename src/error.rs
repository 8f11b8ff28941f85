//! Error types for the manday engine.
//!
//! Only run-level failures live here. Problems with a single row are recovered
//! locally by the normalizer and tallied in
//! [`RunDiagnostics`](crate::models::RunDiagnostics) instead.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the manday engine.
///
/// # Example
///
/// ```
/// use manday_engine::error::EngineError;
///
/// let error = EngineError::MissingParameter {
///     name: "start_date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required parameter: start_date");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A source export could not be opened or decoded.
    #[error("Unreadable source '{source_name}': {message}")]
    UnreadableSource {
        /// The file name or label of the source.
        source_name: String,
        /// A description of the decoding failure.
        message: String,
    },

    /// A required invocation parameter was not supplied.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// The name of the missing parameter.
        name: String,
    },

    /// The requested range ends before it starts.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// The requested range covers more days than a run accepts.
    #[error("Invalid date range: {start} to {end} exceeds {max_days} days")]
    DateRangeTooLong {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
        /// The longest accepted span.
        max_days: i64,
    },

    /// The public holiday lookup failed.
    ///
    /// The pipeline never returns this; it degrades to an empty holiday set.
    #[error("Holiday lookup failed: {message}")]
    HolidayLookupFailed {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
