//! `POST /predict`

use std::time::Instant;

use axum::extract::State;
use tracing::{error, info};

use super::state::AppState;
use super::types::{ApiError, Json, NewsArticle, PredictionResponse};
use crate::infrastructure::observability::record_prediction;

pub async fn predict(
    State(state): State<AppState>,
    Json(article): Json<NewsArticle>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let (variant, classifier) = state.models.resolve(article.model_name.as_deref())?;
    info!(model = %variant, "Received prediction request");

    let input = vec![article.input_text()];
    let start = Instant::now();

    let result = tokio::task::spawn_blocking(move || classifier.predict(&input))
        .await
        .map_err(|e| ApiError::internal(format!("Prediction failed: {}", e)))?;

    let prediction = match result.map(|mut p| p.pop()) {
        Ok(Some(prediction)) => prediction,
        Ok(None) => {
            record_prediction(variant.as_str(), None, start.elapsed());
            return Err(ApiError::internal("Prediction failed: empty model output"));
        }
        Err(e) => {
            error!(model = %variant, error = %e, "Prediction failed");
            record_prediction(variant.as_str(), None, start.elapsed());
            return Err(e.into());
        }
    };

    record_prediction(
        variant.as_str(),
        Some(prediction.leaning.as_str()),
        start.elapsed(),
    );

    info!(
        model = %variant,
        leaning = %prediction.leaning,
        confidence = prediction.confidence,
        "Prediction successful"
    );

    Ok(Json(prediction.into()))
}
