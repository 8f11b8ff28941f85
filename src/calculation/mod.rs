//! Reconciliation logic for the manday engine.
//!
//! This module turns raw progress and leave rows into per-person mandays:
//! row normalization (including the leave matrix layout), calendar
//! classification, leave resolution, the manday fold, and the day-by-day
//! detail views. [`reconcile`] runs them in order.

mod aggregator;
mod calendar;
mod detail_expander;
mod leave_matrix;
mod leave_resolver;
mod normalizer;
mod pipeline;

pub use aggregator::{Aggregation, HOURS_PER_MANDAY, aggregate, capped_manday};
pub use calendar::{DayClassifier, HolidayCalendar, is_weekend};
pub use detail_expander::{DetailViews, expand_details};
pub use leave_matrix::{KnownPeople, MatrixBlock, group_blocks, normalize_leave_matrix};
pub use leave_resolver::{LeaveIndex, LeaveResolution, resolve_leave};
pub use normalizer::{
    PersonIdentity, fold_name, normalize_leave, normalize_progress, parse_date, parse_hours,
};
pub use pipeline::{ReconcileInput, reconcile};
