// Application state module
// Owns the todo store and cached config values shared by all connections

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::todo::TodoStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub todos: TodoStore,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` with an empty todo list
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            todos: TodoStore::new(),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
