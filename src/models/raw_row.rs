//! Raw rows as produced by a source export.
//!
//! A [`RawRow`] keeps the cells in source order. Keyed exports name each cell
//! by its header; positional exports (the leave matrix) use the column index.

use serde::{Deserialize, Serialize};

/// The schema tag of a source export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// One worked-time row per person, date and activity.
    Progress,
    /// One leave row per person, date and leave type.
    Leave,
    /// A date-by-person grid of leave durations grouped in person blocks.
    LeaveMatrix,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::Progress => write!(f, "progress"),
            SchemaKind::Leave => write!(f, "leave"),
            SchemaKind::LeaveMatrix => write!(f, "leave_matrix"),
        }
    }
}

/// A single cell value.
///
/// Exports mix numbers and text freely, so nothing is interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A numeric cell.
    Number(f64),
    /// A textual cell.
    Text(String),
    /// An empty or null cell.
    Empty,
}

impl RawValue {
    /// Returns the trimmed text of the cell, or `None` when it is blank.
    ///
    /// Numbers are rendered without a trailing `.0`, so an ID exported as
    /// `1042.0` reads back as `"1042"`.
    ///
    /// # Example
    ///
    /// ```
    /// use manday_engine::models::RawValue;
    ///
    /// assert_eq!(RawValue::Number(1042.0).text().as_deref(), Some("1042"));
    /// assert_eq!(RawValue::from("  Ada ").text().as_deref(), Some("Ada"));
    /// assert_eq!(RawValue::from("   ").text(), None);
    /// ```
    pub fn text(&self) -> Option<String> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(n.to_string()),
            RawValue::Number(_) | RawValue::Empty => None,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.text().is_none()
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// An ordered sequence of column → value pairs.
///
/// # Example
///
/// ```
/// use manday_engine::models::{RawRow, RawValue};
///
/// let row = RawRow::new()
///     .with("Date", "2024-01-02")
///     .with("Duration", 8.0);
///
/// assert_eq!(row.get("date"), Some(&RawValue::from("2024-01-02")));
/// assert_eq!(row.at(1), Some(&RawValue::Number(8.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawValue)>,
}

impl RawRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell and returns the row, for building rows inline.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a cell.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.push((column.into(), value.into()));
    }

    /// Builds a positional row whose columns are named `"0"`, `"1"`, ...
    pub fn from_positional(values: impl IntoIterator<Item = RawValue>) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect()
    }

    /// Looks a cell up by column name.
    ///
    /// An exact match wins; otherwise the first column whose trimmed name
    /// matches case-insensitively is used.
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .or_else(|| {
                self.cells
                    .iter()
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case(column.trim()))
            })
            .map(|(_, value)| value)
    }

    /// Returns the cell at a position.
    pub fn at(&self, index: usize) -> Option<&RawValue> {
        self.cells.get(index).map(|(_, value)| value)
    }

    /// The number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }

    /// Iterates the cells in source order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_prefers_exact_column() {
        let row = RawRow::new().with("date", "a").with("Date", "b");
        assert_eq!(row.get("Date"), Some(&RawValue::from("b")));
        assert_eq!(row.get("date"), Some(&RawValue::from("a")));
    }

    #[test]
    fn test_get_falls_back_to_case_insensitive_match() {
        let row = RawRow::new().with(" EmployeeID ", "E-7");
        assert_eq!(row.get("employeeid"), Some(&RawValue::from("E-7")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_positional_row_names_columns_by_index() {
        let row = RawRow::from_positional(vec![RawValue::from("Ada"), RawValue::Number(4.0)]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("1"), Some(&RawValue::Number(4.0)));
        assert_eq!(row.at(0), Some(&RawValue::from("Ada")));
        assert_eq!(row.at(2), None);
    }

    #[test]
    fn test_blank_row_detection() {
        let row = RawRow::from_positional(vec![RawValue::Empty, RawValue::from("  ")]);
        assert!(row.is_blank());
        assert!(!RawRow::new().with("x", 0.0).is_blank());
    }

    #[test]
    fn test_number_text_drops_trailing_zero() {
        assert_eq!(RawValue::Number(7.5).text().as_deref(), Some("7.5"));
        assert_eq!(RawValue::Number(12.0).text().as_deref(), Some("12"));
        assert_eq!(RawValue::Number(f64::NAN).text(), None);
    }

    #[test]
    fn test_deserialize_mixed_values() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[1.5, "x", null]"#).unwrap();
        assert_eq!(
            values,
            vec![RawValue::Number(1.5), RawValue::from("x"), RawValue::Empty]
        );
    }

    #[test]
    fn test_schema_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SchemaKind::LeaveMatrix).unwrap();
        assert_eq!(json, "\"leave_matrix\"");
        assert_eq!(SchemaKind::Progress.to_string(), "progress");
    }
}
