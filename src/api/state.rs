//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::{ExperimentTracker, ModelRegistry, OutletDirectory};
use crate::infrastructure::news::OutletNewsService;

/// Read-only services built once at startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub models: Arc<ModelRegistry>,
    pub outlets: Arc<OutletDirectory>,
    pub outlet_news: Arc<OutletNewsService>,
    /// Present only when a tracking server and experiment are configured
    pub tracking: Option<TrackingHandle>,
}

/// Experiment tracker bound to the experiment whose metrics are served
#[derive(Debug, Clone)]
pub struct TrackingHandle {
    pub tracker: Arc<dyn ExperimentTracker>,
    pub experiment_name: String,
}

impl AppState {
    pub fn new(models: ModelRegistry, outlet_news: OutletNewsService) -> Self {
        Self {
            models: Arc::new(models),
            outlets: Arc::new(OutletDirectory::default()),
            outlet_news: Arc::new(outlet_news),
            tracking: None,
        }
    }

    pub fn with_outlets(mut self, outlets: OutletDirectory) -> Self {
        self.outlets = Arc::new(outlets);
        self
    }

    pub fn with_tracking(
        mut self,
        tracker: Arc<dyn ExperimentTracker>,
        experiment_name: impl Into<String>,
    ) -> Self {
        self.tracking = Some(TrackingHandle {
            tracker,
            experiment_name: experiment_name.into(),
        });
        self
    }
}
