use std::fmt::Debug;

use super::{ClassifierError, ModelVariant, Prediction};

/// A loaded text classifier bound to a device.
///
/// `predict` is blocking; async callers should run it on the blocking pool.
pub trait TextClassifier: Send + Sync + Debug {
    /// Classify each input text, preserving input order
    fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError>;

    fn variant(&self) -> ModelVariant;

    /// Name of the device the model runs on
    fn device_name(&self) -> &str;
}
