// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::controller::{self, AppFactory};
use crate::sql::Profiler;

/// Application state
pub struct AppState {
    pub config: Config,
    pub factory: AppFactory,
    pub profiler: Arc<Profiler>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let profiler = Arc::new(Profiler::new(
            config.profiler.active,
            config.profiler.capture_trace,
        ));
        Self {
            config: config.clone(),
            factory: controller::build_factory(&config.controllers),
            profiler,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
