//! Request types for the manday engine API.
//!
//! This module defines the JSON request structures for the `/reconcile`
//! endpoint. Every top-level field is optional at the JSON level so that a
//! missing required parameter is reported as `MISSING_PARAMETER` instead of
//! a generic deserialization error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::ReconcileInput;
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, PublicHoliday, RawRow, RawValue, SchemaKind, SummarySort};

/// Request body for the `/reconcile` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// First day of the reporting range (inclusive). Required.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the reporting range (inclusive). Required.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Rows of the progress export. Required, may be empty.
    #[serde(default)]
    pub progress_rows: Option<Vec<RawRowInput>>,
    /// Rows of the leave export. Required, may be empty.
    #[serde(default)]
    pub leave_rows: Option<Vec<RawRowInput>>,
    /// Layout of `leave_rows`; keyed leave rows when absent.
    #[serde(default)]
    pub leave_schema: Option<SchemaKind>,
    /// Holidays to use instead of the configured holiday source.
    #[serde(default)]
    pub public_holidays: Option<Vec<PublicHolidayRequest>>,
    /// Summary ordering.
    #[serde(default)]
    pub sort: Option<SummarySort>,
    /// Case-insensitive name filter for the summary.
    #[serde(default)]
    pub name_filter: Option<String>,
}

/// A row as sent over JSON: an object keyed by column, or a positional array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRowInput {
    /// `{"Date": "2024-01-02", "Duration": 8}`
    Keyed(BTreeMap<String, RawValue>),
    /// `["Illness", 8, null]`
    Positional(Vec<RawValue>),
}

/// Public holiday information in a reconcile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHolidayRequest {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    #[serde(default)]
    pub name: String,
    /// The region where this holiday applies.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "national".to_string()
}

/// A request whose required parameters are present and consistent.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// The pipeline input.
    pub input: ReconcileInput,
    /// Per-request holidays, replacing the configured source when present.
    pub public_holidays: Option<Vec<PublicHoliday>>,
}

impl TryFrom<ReconcileRequest> for ValidatedRequest {
    type Error = EngineError;

    fn try_from(req: ReconcileRequest) -> EngineResult<Self> {
        let start_date = required(req.start_date, "start_date")?;
        let end_date = required(req.end_date, "end_date")?;
        let progress_rows = required(req.progress_rows, "progress_rows")?;
        let leave_rows = required(req.leave_rows, "leave_rows")?;
        let range = DateRange::new(start_date, end_date)?;

        let mut input = ReconcileInput::new(
            range,
            progress_rows.into_iter().map(Into::into).collect(),
            leave_rows.into_iter().map(Into::into).collect(),
        )
        .with_sort(req.sort.unwrap_or_default());
        if let Some(schema) = req.leave_schema {
            input = input.with_leave_schema(schema);
        }
        if let Some(filter) = req.name_filter {
            input = input.with_name_filter(filter);
        }

        Ok(Self {
            input,
            public_holidays: req
                .public_holidays
                .map(|holidays| holidays.into_iter().map(Into::into).collect()),
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::MissingParameter {
        name: name.to_string(),
    })
}

impl From<RawRowInput> for RawRow {
    fn from(input: RawRowInput) -> Self {
        match input {
            RawRowInput::Keyed(cells) => cells.into_iter().collect(),
            RawRowInput::Positional(values) => RawRow::from_positional(values),
        }
    }
}

impl From<PublicHolidayRequest> for PublicHoliday {
    fn from(req: PublicHolidayRequest) -> Self {
        PublicHoliday {
            date: req.date,
            name: req.name,
            region: req.region,
        }
    }
}
