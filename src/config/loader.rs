//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading schema
//! configuration and the holiday source from a directory of YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::sources::{HolidayFile, HolidayProvider, NoHolidays};

use super::types::SchemaConfig;

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── schemas.yaml   # Column names, matrix layout and leave labels
/// └── holidays.yaml  # Optional public holiday list
/// ```
///
/// `holidays.yaml` is only located here. It is read on every lookup, so a
/// corrupt file degrades a run to an empty holiday set rather than failing
/// the load.
///
/// # Example
///
/// ```no_run
/// use manday_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Progress date column: {}", loader.schemas().progress.date);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    schemas: SchemaConfig,
    holidays: Arc<dyn HolidayProvider>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns an error if `schemas.yaml` is missing or is not valid YAML for
    /// [`SchemaConfig`]. A missing `holidays.yaml` means no holidays.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let schemas_path = path.join("schemas.yaml");
        let schemas = load_yaml::<SchemaConfig>(&schemas_path)?;

        let holidays_path = path.join("holidays.yaml");
        let holidays: Arc<dyn HolidayProvider> = if holidays_path.exists() {
            debug!(path = %holidays_path.display(), "Using holiday file");
            Arc::new(HolidayFile::new(holidays_path))
        } else {
            debug!(path = %path.display(), "No holiday file configured");
            Arc::new(NoHolidays)
        };

        Ok(Self { schemas, holidays })
    }

    /// Creates a loader with default schemas and no holidays.
    pub fn with_defaults() -> Self {
        Self {
            schemas: SchemaConfig::default(),
            holidays: Arc::new(NoHolidays),
        }
    }

    /// Replaces the holiday source.
    pub fn with_holidays(mut self, provider: impl HolidayProvider + 'static) -> Self {
        self.holidays = Arc::new(provider);
        self
    }

    /// Returns the schema configuration.
    pub fn schemas(&self) -> &SchemaConfig {
        &self.schemas
    }

    /// Returns the configured holiday source.
    pub fn holiday_provider(&self) -> &dyn HolidayProvider {
        self.holidays.as_ref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
