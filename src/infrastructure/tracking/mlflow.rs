//! MLflow tracking server client (REST API 2.0)

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::domain::{DomainError, ExperimentTracker, RunMetrics};
use crate::infrastructure::http_client::{build_client, truncate_body};

const SERVICE: &str = "mlflow";
const RESOURCE_DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

#[derive(Debug, Deserialize)]
struct GetExperimentResponse {
    experiment: Experiment,
}

#[derive(Debug, Deserialize)]
struct Experiment {
    experiment_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchRunsResponse {
    #[serde(default)]
    runs: Vec<Run>,
}

#[derive(Debug, Deserialize)]
struct Run {
    info: RunInfo,
    #[serde(default)]
    data: RunData,
}

#[derive(Debug, Deserialize)]
struct RunInfo {
    run_id: String,
    #[serde(default)]
    run_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    start_time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RunData {
    #[serde(default)]
    metrics: Vec<Metric>,
}

#[derive(Debug, Deserialize)]
struct Metric {
    key: String,
    value: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
}

/// HTTP client for an MLflow tracking server
#[derive(Debug, Clone)]
pub struct MlflowClient {
    client: reqwest::Client,
    base_url: String,
}

impl MlflowClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_uri(uri: &str, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self::new(build_client(timeout, None)?, uri))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/2.0/mlflow/{}", self.base_url, endpoint)
    }

    async fn experiment_id(&self, name: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(self.url("experiments/get-by-name"))
            .query(&[("experiment_name", name)])
            .send()
            .await
            .map_err(|e| DomainError::external_api(SERVICE, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            let error: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            if status == StatusCode::NOT_FOUND
                || error.error_code.as_deref() == Some(RESOURCE_DOES_NOT_EXIST)
            {
                return Err(DomainError::not_found(format!(
                    "Experiment '{}' not found",
                    name
                )));
            }

            return Err(http_error(status, &body));
        }

        let parsed: GetExperimentResponse = parse(&body)?;
        Ok(parsed.experiment.experiment_id)
    }

    async fn latest_run(&self, experiment_id: &str) -> Result<Option<Run>, DomainError> {
        let response = self
            .client
            .post(self.url("runs/search"))
            .json(&json!({
                "experiment_ids": [experiment_id],
                "max_results": 1,
                "order_by": ["attributes.start_time DESC"],
            }))
            .send()
            .await
            .map_err(|e| DomainError::external_api(SERVICE, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            return Err(http_error(status, &body));
        }

        // An experiment without runs answers `{}`
        let parsed: SearchRunsResponse = parse(&body)?;
        Ok(parsed.runs.into_iter().next())
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, DomainError> {
    response
        .text()
        .await
        .map_err(|e| DomainError::external_api(SERVICE, format!("Failed to read response: {}", e)))
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, DomainError> {
    serde_json::from_str(body)
        .map_err(|e| DomainError::external_api(SERVICE, format!("Failed to parse response: {}", e)))
}

fn http_error(status: StatusCode, body: &str) -> DomainError {
    DomainError::external_api(
        SERVICE,
        format!("HTTP {}: {}", status, truncate_body(body, 200)),
    )
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

#[async_trait]
impl ExperimentTracker for MlflowClient {
    async fn latest_run_metrics(&self, experiment_name: &str) -> Result<RunMetrics, DomainError> {
        let experiment_id = self.experiment_id(experiment_name).await?;
        debug!(experiment = %experiment_name, experiment_id = %experiment_id, "Resolved experiment");

        let run = self.latest_run(&experiment_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("No runs found for experiment '{}'", experiment_name))
        })?;

        let metrics: BTreeMap<String, f64> = run
            .data
            .metrics
            .into_iter()
            .map(|m| (m.key, m.value))
            .collect();

        Ok(RunMetrics {
            experiment_name: experiment_name.to_string(),
            run_id: run.info.run_id,
            run_name: run.info.run_name,
            status: run.info.status,
            start_time: run.info.start_time.and_then(millis_to_datetime),
            metrics,
        })
    }
}
