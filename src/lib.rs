//! Political Leaning API
//!
//! Classifies news articles as Left, Center or Right with a fine-tuned BERT
//! model and serves:
//! - predictions for submitted articles
//! - recent articles of known news outlets, scraped to plain text
//! - metrics of the latest training run from an MLflow tracking server

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use infrastructure::inference::load_registry;
use infrastructure::news::{NewsApiClient, OutletNewsService};
use infrastructure::scraper::WebScraper;
use infrastructure::tracking::MlflowClient;
use tracing::info;

/// Build the application state: load every configured model and wire the
/// outlet and tracking clients.
///
/// Blocking: model weights are read and built on the calling thread.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let models = load_registry(&config.inference)?;

    let search = NewsApiClient::from_config(&config.news)?;
    let scraper = WebScraper::from_config(&config.scraper)?;
    let outlet_news = OutletNewsService::new(Arc::new(search), Arc::new(scraper))
        .with_max_articles(config.news.max_articles);

    let mut state = AppState::new(models, outlet_news);

    match config.tracking.target() {
        Some((uri, experiment_name)) => {
            let tracker =
                MlflowClient::from_uri(uri, Duration::from_secs(config.tracking.timeout_secs))?;
            info!(uri = %uri, experiment = %experiment_name, "Experiment tracking enabled");
            state = state.with_tracking(Arc::new(tracker), experiment_name);
        }
        None => info!("Experiment tracking not configured; /model/metrics is disabled"),
    }

    Ok(state)
}
