//! Public holiday sources.
//!
//! The holiday lookup is the one collaborator whose failure is recoverable:
//! [`resolve_holidays`] degrades any error to an empty set and records it in
//! the run diagnostics.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::calculation::HolidayCalendar;
use crate::config::load_yaml;
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, PublicHoliday, RunDiagnostics};

/// Supplies public holidays for a reporting range.
pub trait HolidayProvider: fmt::Debug + Send + Sync {
    /// Returns the holidays that fall within `range`.
    fn holidays(&self, range: &DateRange) -> EngineResult<Vec<PublicHoliday>>;
}

/// A source with no holidays. The default when nothing is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayProvider for NoHolidays {
    fn holidays(&self, _range: &DateRange) -> EngineResult<Vec<PublicHoliday>> {
        Ok(Vec::new())
    }
}

/// An in-memory holiday list.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    holidays: Vec<PublicHoliday>,
}

impl StaticHolidays {
    /// Creates a source from a list of holidays.
    pub fn new(holidays: Vec<PublicHoliday>) -> Self {
        Self { holidays }
    }
}

impl HolidayProvider for StaticHolidays {
    fn holidays(&self, range: &DateRange) -> EngineResult<Vec<PublicHoliday>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| range.contains_date(h.date))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct HolidayList {
    #[serde(default)]
    holidays: Vec<PublicHoliday>,
}

/// A YAML holiday list read on every lookup.
///
/// ```yaml
/// holidays:
///   - date: "2024-12-25"
///     name: Christmas Day
/// ```
#[derive(Debug, Clone)]
pub struct HolidayFile {
    path: PathBuf,
}

impl HolidayFile {
    /// Creates a source backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HolidayProvider for HolidayFile {
    fn holidays(&self, range: &DateRange) -> EngineResult<Vec<PublicHoliday>> {
        let list = load_yaml::<HolidayList>(&self.path).map_err(|e| {
            EngineError::HolidayLookupFailed {
                message: e.to_string(),
            }
        })?;
        StaticHolidays::new(list.holidays).holidays(range)
    }
}

/// Looks holidays up for a run, degrading failure to an empty set.
///
/// A failed lookup is logged, flagged in `diagnostics`, and never aborts the
/// run: weekends still classify, only holiday overtime becomes unreachable.
pub fn resolve_holidays(
    provider: &dyn HolidayProvider,
    range: &DateRange,
    diagnostics: &mut RunDiagnostics,
) -> HolidayCalendar {
    match provider.holidays(range) {
        Ok(holidays) => {
            debug!(count = holidays.len(), "Resolved public holidays");
            HolidayCalendar::new(holidays.iter().map(|h| h.date))
        }
        Err(err) => {
            warn!(error = %err, "Holiday lookup failed, continuing without holidays");
            diagnostics.holiday_lookup_failed = true;
            HolidayCalendar::default()
        }
    }
}
