//! Application state for the compliance and payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::WorkStore;

/// Shared application state.
///
/// Holds the loaded configuration and the work store. Both are shared
/// read-only across handlers; the store serializes its own writes.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn WorkStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Arc<dyn WorkStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the work store.
    pub fn store(&self) -> &dyn WorkStore {
        self.store.as_ref()
    }

    /// Returns owned handles for work moved off the async runtime.
    pub(crate) fn handles(&self) -> (Arc<ConfigLoader>, Arc<dyn WorkStore>) {
        (Arc::clone(&self.config), Arc::clone(&self.store))
    }
}
