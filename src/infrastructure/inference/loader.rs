use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::BertClassifier;
use crate::config::InferenceConfig;
use crate::domain::{DomainError, ModelRegistry, ModelVariant, TextClassifier};

/// Load every configured model variant onto the resolved device
pub fn load_registry(config: &InferenceConfig) -> Result<ModelRegistry, DomainError> {
    let device_kind = config.device_kind();
    let device = device_kind.to_candle().map_err(|e| {
        DomainError::configuration(format!("Failed to open {} device: {}", device_kind, e))
    })?;

    let mut models: HashMap<ModelVariant, Arc<dyn TextClassifier>> = HashMap::new();

    for variant in ModelVariant::ALL {
        let Some(spec) = config.models.get(&variant) else {
            continue;
        };

        let classifier = BertClassifier::load(variant, spec, &device)
            .map_err(|e| DomainError::configuration(format!("model '{}': {}", variant, e)))?;

        models.insert(variant, Arc::new(classifier));
    }

    let default_model = config
        .default_variant()
        .ok_or_else(|| DomainError::configuration("No default model configured"))?;
    let registry = ModelRegistry::new(default_model, models)?;

    info!(
        models = ?registry.variants(),
        default = %registry.default_variant(),
        device = %device_kind,
        "Model registry ready"
    );

    Ok(registry)
}
