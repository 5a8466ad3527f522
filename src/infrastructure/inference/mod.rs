//! Model loading and inference on candle

mod bert;
mod loader;
mod lora;

pub use bert::{BertClassifier, MAX_SEQUENCE_LENGTH};
pub use loader::load_registry;
pub use lora::{AdapterConfig, MergeSummary, TargetModules, merge_lora};
