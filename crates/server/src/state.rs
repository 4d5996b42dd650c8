//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use intake_agent::IntakeController;

use crate::sessions::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<IntakeController>,
    pub sessions: SessionRegistry,
    /// Required by the internal case-data route; `None` disables the route
    pub staff_token: Option<Arc<str>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(controller: IntakeController, staff_token: Option<String>) -> Self {
        Self {
            controller: Arc::new(controller),
            sessions: SessionRegistry::new(),
            staff_token: staff_token
                .filter(|t| !t.is_empty())
                .map(Arc::from),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
