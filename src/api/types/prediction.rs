use serde::{Deserialize, Serialize};

use crate::domain::classifier::NUM_CLASSES;
use crate::domain::{Leaning, Prediction};

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    /// Model variant to use; the default model when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl NewsArticle {
    /// Text handed to the classifier
    pub fn input_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Leaning,
    pub confidence: f32,
    pub probabilities: [f32; NUM_CLASSES],
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.leaning,
            confidence: prediction.confidence,
            probabilities: prediction.probabilities,
        }
    }
}
