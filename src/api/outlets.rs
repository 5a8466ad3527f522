//! News outlet endpoints

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::{info, warn};

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::OutletArticle;

#[derive(Debug, Default, Deserialize)]
pub struct OutletQuery {
    /// Free-text filter passed to the news search
    pub q: Option<String>,
}

/// `GET /outlets`
pub async fn list_outlets(State(state): State<AppState>) -> Json<Vec<String>> {
    info!("Fetching list of news outlets");

    Json(state.outlets.names().into_iter().map(String::from).collect())
}

/// `GET /outlets/{outlet}`
pub async fn outlet_news(
    State(state): State<AppState>,
    Path(outlet): Path<String>,
    Query(query): Query<OutletQuery>,
) -> Result<Json<Vec<OutletArticle>>, ApiError> {
    let Some(source_id) = state.outlets.source_id(&outlet) else {
        warn!(outlet = %outlet, "No outlets found");
        return Err(ApiError::not_found("No outlets found."));
    };

    info!(outlet = %outlet, source_id = %source_id, "Fetching outlet news");

    match state.outlet_news.fetch(source_id, query.q.as_deref()).await? {
        Some(articles) => {
            info!(outlet = %outlet, count = articles.len(), "Fetched outlet news");
            Ok(Json(articles))
        }
        None => Err(ApiError::not_found(format!(
            "No articles found for outlet '{}'",
            outlet
        ))),
    }
}
