//! Domain layer - Core entities and the seams implemented by infrastructure

pub mod classifier;
pub mod error;
pub mod news;
pub mod tracking;

pub use classifier::{
    ClassifierError, Leaning, ModelRegistry, ModelVariant, Prediction, TextClassifier,
};
pub use error::DomainError;
pub use news::{
    NewsSearch, Outlet, OutletArticle, OutletDirectory, ScrapeError, Scraper, SearchArticle,
    SearchResponse,
};
pub use tracking::{ExperimentTracker, RunMetrics};
