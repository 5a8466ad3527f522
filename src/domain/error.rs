use thiserror::Error;

use super::classifier::ClassifierError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("External API error: {service} - {message}")]
    ExternalApi { service: String, message: String },

    #[error("Prediction failed: {message}")]
    Prediction { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn external_api(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalApi {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ClassifierError> for DomainError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Prediction { message } => Self::prediction(message),
            other => Self::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Outlet 'Daily Planet' not found");
        assert_eq!(error.to_string(), "Not found: Outlet 'Daily Planet' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Unknown model 'gpt'");
        assert_eq!(error.to_string(), "Validation error: Unknown model 'gpt'");
    }

    #[test]
    fn test_external_api_error() {
        let error = DomainError::external_api("newsapi", "HTTP 500");
        assert_eq!(error.to_string(), "External API error: newsapi - HTTP 500");
    }

    #[test]
    fn test_classifier_prediction_error_conversion() {
        let error: DomainError = ClassifierError::prediction("shape mismatch").into();
        assert_eq!(error.to_string(), "Prediction failed: shape mismatch");
    }
}
