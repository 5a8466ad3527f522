//! Text classification domain: leaning classes, model variants and the
//! classifier seam implemented by the inference layer.

mod error;
mod prediction;
mod provider;
mod registry;
mod variant;

pub use error::ClassifierError;
pub use prediction::{Leaning, NUM_CLASSES, Prediction};
pub use provider::TextClassifier;
pub use registry::ModelRegistry;
pub use variant::ModelVariant;

#[cfg(test)]
pub use provider::mock;
