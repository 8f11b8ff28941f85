//! Configuration loading and management for the manday engine.
//!
//! This module loads source schema descriptions (column names, leave matrix
//! layout, leave labels) and locates the holiday list.
//!
//! # Example
//!
//! ```no_run
//! use manday_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Leave type column: {}", config.schemas().leave.leave_type);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::ConfigLoader;
pub use types::{
    DurationUnit, LeaveColumns, LeaveLabels, MatrixLayout, ProgressColumns, SchemaConfig,
};
