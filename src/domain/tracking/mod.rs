//! Experiment tracking: metrics logged by training runs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Metrics of the most recent run of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub experiment_name: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    pub metrics: BTreeMap<String, f64>,
}

/// Trait for experiment-tracking backends
#[async_trait]
pub trait ExperimentTracker: Send + Sync + std::fmt::Debug {
    /// Latest run's metrics; `NotFound` when the experiment or any run is missing
    async fn latest_run_metrics(&self, experiment_name: &str) -> Result<RunMetrics, DomainError>;
}
