use std::sync::Arc;

use crate::services::monitor::MonitorController;

// App state
pub struct AppState {
    pub monitor: Arc<MonitorController>,
}

impl AppState {
    pub fn new(monitor: MonitorController) -> Self {
        Self {
            monitor: Arc::new(monitor),
        }
    }
}
