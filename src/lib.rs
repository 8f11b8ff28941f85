//! Manday reconciliation engine
//!
//! This crate reconciles a progress (timesheet) export against a leave export
//! and reports per-person worked mandays, weekend and holiday overtime, and
//! leave broken down by kind, along with day-by-day detail views for audit.
//!
//! # Example
//!
//! ```no_run
//! use manday_engine::calculation::{ReconcileInput, reconcile};
//! use manday_engine::config::ConfigLoader;
//! use manday_engine::models::{DateRange, SchemaKind};
//! use manday_engine::sources::read_csv_file;
//! use chrono::NaiveDate;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! ).unwrap();
//!
//! let progress = read_csv_file("progress.csv", SchemaKind::Progress).unwrap();
//! let leave = read_csv_file("leave.csv", SchemaKind::Leave).unwrap();
//!
//! let input = ReconcileInput::new(range, progress, leave);
//! let report = reconcile(&input, config.schemas(), config.holiday_provider()).unwrap();
//! for row in &report.summary {
//!     println!("{}: {} mandays", row.display_name, row.mandays);
//! }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod sources;
