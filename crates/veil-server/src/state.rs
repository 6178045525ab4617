//! Shared application state.

use veil_core::VeilConfig;
use veil_redact::Redactor;

use crate::retention::MapStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: VeilConfig,
    pub redactor: Redactor,
    pub maps: MapStore,
}

impl AppState {
    pub fn new(config: VeilConfig) -> Self {
        let redactor = Redactor::new(config.engine.clone());
        let maps = MapStore::new(&config.retention);
        Self {
            config,
            redactor,
            maps,
        }
    }
}
