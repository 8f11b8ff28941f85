//! Leave resolution.
//!
//! Collapses all leave entries for one person-day into a single effective
//! entry. A day has exactly one status: durations of the same kind are
//! summed, then the highest-priority kind wins and the rest are discarded.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{LeaveKind, NormalizedEntry};

/// Effective leave per person and date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveIndex {
    days: BTreeMap<String, BTreeMap<NaiveDate, NormalizedEntry>>,
}

impl LeaveIndex {
    /// The effective leave entry for a person-day.
    pub fn get(&self, person_key: &str, date: NaiveDate) -> Option<&NormalizedEntry> {
        self.days.get(person_key).and_then(|days| days.get(&date))
    }

    /// Returns true when the person has leave on `date`.
    pub fn contains(&self, person_key: &str, date: NaiveDate) -> bool {
        self.get(person_key, date).is_some()
    }

    /// Iterates every effective entry ordered by person key, then date.
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedEntry> {
        self.days.values().flat_map(|days| days.values())
    }

    /// Number of person-days with leave.
    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    /// Returns true when nobody has leave.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Result of [`resolve_leave`].
#[derive(Debug, Clone, Default)]
pub struct LeaveResolution {
    /// One effective entry per person-day.
    pub index: LeaveIndex,
    /// Leave entries discarded because a higher-priority kind shared their day.
    pub masked_entries: usize,
}

#[derive(Debug)]
struct KindTotal {
    entry: NormalizedEntry,
    rows: usize,
}

/// Builds the leave index from normalized leave entries.
///
/// Work entries are ignored.
///
/// # Example
///
/// ```
/// use manday_engine::calculation::resolve_leave;
/// use manday_engine::models::{EntrySource, LeaveKind, NormalizedEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let leave = |kind, hours| NormalizedEntry {
///     person_key: "e-1".into(),
///     person_display_name: "Ada Lovelace".into(),
///     employee_id: None,
///     date: day,
///     duration_hours: Decimal::from(hours),
///     source: EntrySource::Leave,
///     leave_kind: Some(kind),
///     leave_label: None,
///     activity_label: None,
/// };
///
/// let resolution = resolve_leave(&[leave(LeaveKind::Paid, 6), leave(LeaveKind::Unassigned, 2)]);
/// let winner = resolution.index.get("e-1", day).unwrap();
/// assert_eq!(winner.leave_kind, Some(LeaveKind::Unassigned));
/// assert_eq!(winner.duration_hours, Decimal::from(2));
/// assert_eq!(resolution.masked_entries, 1);
/// ```
pub fn resolve_leave(entries: &[NormalizedEntry]) -> LeaveResolution {
    let mut groups: BTreeMap<(&str, NaiveDate), BTreeMap<LeaveKind, KindTotal>> = BTreeMap::new();

    for entry in entries {
        let Some(kind) = entry.effective_leave_kind() else {
            continue;
        };
        groups
            .entry((entry.person_key.as_str(), entry.date))
            .or_default()
            .entry(kind)
            .and_modify(|total| {
                total.entry.duration_hours += entry.duration_hours;
                total.rows += 1;
            })
            .or_insert_with(|| {
                let mut first = entry.clone();
                first.leave_kind = Some(kind);
                KindTotal {
                    entry: first,
                    rows: 1,
                }
            });
    }

    let mut resolution = LeaveResolution::default();
    for ((person_key, date), kinds) in groups {
        let total_rows: usize = kinds.values().map(|k| k.rows).sum();
        let Some(winner) = kinds
            .into_values()
            .max_by_key(|total| total.entry.leave_kind.map(LeaveKind::priority))
        else {
            continue;
        };

        let masked = total_rows - winner.rows;
        if masked > 0 {
            debug!(
                person = person_key,
                date = %date,
                kept = ?winner.entry.leave_kind,
                masked,
                "Masked lower-priority leave"
            );
        }
        resolution.masked_entries += masked;
        resolution
            .index
            .days
            .entry(person_key.to_string())
            .or_default()
            .insert(date, winner.entry);
    }

    resolution
}
