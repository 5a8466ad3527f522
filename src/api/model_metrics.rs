//! `GET /model/metrics`

use axum::extract::State;
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::RunMetrics;

/// Metrics of the most recent training run of the configured experiment
pub async fn model_metrics(State(state): State<AppState>) -> Result<Json<RunMetrics>, ApiError> {
    let Some(tracking) = state.tracking.as_ref() else {
        return Err(ApiError::not_found("Experiment tracking is not configured"));
    };

    debug!(experiment = %tracking.experiment_name, "Fetching latest run metrics");

    let metrics = tracking
        .tracker
        .latest_run_metrics(&tracking.experiment_name)
        .await?;

    Ok(Json(metrics))
}
