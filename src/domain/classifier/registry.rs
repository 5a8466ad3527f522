//! Loaded classifiers keyed by model variant

use std::collections::HashMap;
use std::sync::Arc;

use super::{ModelVariant, TextClassifier};
use crate::domain::DomainError;

/// Read-only mapping of model variants to loaded classifiers.
///
/// Built once at startup; the default variant is guaranteed to be present.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<ModelVariant, Arc<dyn TextClassifier>>,
    default: ModelVariant,
}

impl ModelRegistry {
    pub fn new(
        default: ModelVariant,
        models: HashMap<ModelVariant, Arc<dyn TextClassifier>>,
    ) -> Result<Self, DomainError> {
        if models.is_empty() {
            return Err(DomainError::configuration("no models loaded"));
        }

        if !models.contains_key(&default) {
            return Err(DomainError::configuration(format!(
                "default model '{}' is not loaded",
                default
            )));
        }

        Ok(Self { models, default })
    }

    /// Registry holding a single classifier, which is also the default
    pub fn single(classifier: Arc<dyn TextClassifier>) -> Self {
        let default = classifier.variant();
        let mut models = HashMap::new();
        models.insert(default, classifier);

        Self { models, default }
    }

    /// Resolve an optional requested model name.
    ///
    /// `None` selects the default model. Unknown names and variants that are
    /// not loaded are validation errors.
    pub fn resolve(
        &self,
        name: Option<&str>,
    ) -> Result<(ModelVariant, Arc<dyn TextClassifier>), DomainError> {
        let variant = match name {
            Some(name) => name.parse::<ModelVariant>()?,
            None => self.default,
        };

        self.models
            .get(&variant)
            .map(|classifier| (variant, Arc::clone(classifier)))
            .ok_or_else(|| DomainError::validation(format!("Model '{}' is not loaded", variant)))
    }

    pub fn default_variant(&self) -> ModelVariant {
        self.default
    }

    /// Loaded variants in declaration order
    pub fn variants(&self) -> Vec<ModelVariant> {
        ModelVariant::ALL
            .into_iter()
            .filter(|v| self.models.contains_key(v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
