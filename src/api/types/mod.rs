//! Request and response types of the HTTP API

pub mod error;
pub mod json;
pub mod prediction;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use prediction::{NewsArticle, PredictionResponse};
