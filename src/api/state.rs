//! Application state for the manday engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded schemas and the configured holiday source, shared across
/// all request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ConfigLoader::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }

    #[test]
    fn test_default_state_uses_default_schemas() {
        let state = AppState::default();
        assert_eq!(state.config().schemas().progress.date, "Date");
    }
}
