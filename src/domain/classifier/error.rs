//! Classifier-specific errors

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or running a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A required artifact (weights, tokenizer, config, adapter) is absent
    #[error("Model file not found: {}", path.display())]
    ModelFileMissing { path: PathBuf },

    /// Artifact present but unusable
    #[error("Failed to load model: {message}")]
    Load { message: String },

    /// Tokenization or forward pass failure
    #[error("Prediction error: {message}")]
    Prediction { message: String },
}

impl ClassifierError {
    pub fn missing(path: impl AsRef<Path>) -> Self {
        Self::ModelFileMissing {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::ModelFileMissing { .. })
    }
}
