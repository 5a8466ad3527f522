//! BERT sequence classifier on candle

use std::collections::HashMap;
use std::path::Path;

use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::lora::{AdapterConfig, merge_lora};
use crate::config::ModelSpec;
use crate::domain::classifier::NUM_CLASSES;
use crate::domain::{ClassifierError, ModelVariant, Prediction, TextClassifier};

/// Tokens per input after truncation and padding
pub const MAX_SEQUENCE_LENGTH: usize = 128;

const BASE_PREFIX: &str = "bert";

/// Fields of `config.json` needed beyond the encoder config
#[derive(Debug, Deserialize)]
struct HeadConfig {
    hidden_size: usize,
}

/// BERT encoder, pooler and 3-way classification head
pub struct BertClassifier {
    variant: ModelVariant,
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
    device_name: &'static str,
}

impl std::fmt::Debug for BertClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertClassifier")
            .field("variant", &self.variant)
            .field("device", &self.device_name)
            .finish_non_exhaustive()
    }
}

fn require_file(path: &Path) -> Result<(), ClassifierError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ClassifierError::missing(path))
    }
}

fn load_err(context: &'static str) -> impl Fn(candle_core::Error) -> ClassifierError {
    move |e| ClassifierError::load(format!("{}: {}", context, e))
}

/// On-disk layout of a weights file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightFormat {
    SafeTensors,
    /// `torch.save(model.state_dict())` output
    TorchPickle,
}

impl WeightFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("pt" | "pth" | "bin") => Self::TorchPickle,
            _ => Self::SafeTensors,
        }
    }
}

fn read_weights(path: &Path, device: &Device) -> Result<HashMap<String, Tensor>, ClassifierError> {
    match WeightFormat::of(path) {
        WeightFormat::SafeTensors => candle_core::safetensors::load(path, device)
            .map_err(load_err("Failed to read safetensors weights")),
        WeightFormat::TorchPickle => candle_core::pickle::read_all(path)
            .and_then(|tensors| {
                tensors
                    .into_iter()
                    .map(|(name, tensor)| Ok((name, tensor.to_device(device)?)))
                    .collect()
            })
            .map_err(load_err("Failed to read torch checkpoint")),
    }
}

fn predict_err(e: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::prediction(e.to_string())
}

fn device_name(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

impl BertClassifier {
    /// Load weights (plus optional adapter) and tokenizer onto `device`.
    ///
    /// Missing artifacts are reported as [`ClassifierError::ModelFileMissing`];
    /// anything else that goes wrong is [`ClassifierError::Load`].
    pub fn load(
        variant: ModelVariant,
        spec: &ModelSpec,
        device: &Device,
    ) -> Result<Self, ClassifierError> {
        let config_path = spec.config_path();
        let tokenizer_path = spec.tokenizer_path();
        let adapter = match (&spec.adapter_path, spec.adapter_config_path()) {
            (Some(weights), Some(config)) => Some((weights.clone(), config)),
            _ => None,
        };

        require_file(&spec.weights_path)?;
        require_file(&config_path)?;
        require_file(&tokenizer_path)?;
        if let Some((ref weights, ref config)) = adapter {
            require_file(weights)?;
            require_file(config)?;
        }

        info!(
            model = %variant,
            path = %spec.weights_path.display(),
            device = device_name(device),
            "Loading model"
        );

        let raw_config = std::fs::read_to_string(&config_path)
            .map_err(|e| ClassifierError::load(format!("{}: {}", config_path.display(), e)))?;
        let bert_config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| ClassifierError::load(format!("Invalid model config: {}", e)))?;
        let head: HeadConfig = serde_json::from_str(&raw_config)
            .map_err(|e| ClassifierError::load(format!("Invalid model config: {}", e)))?;

        let mut weights = read_weights(&spec.weights_path, device)?;

        if let Some((ref adapter_weights, ref adapter_config)) = adapter {
            let config = AdapterConfig::from_file(adapter_config)?;
            let tensors = read_weights(adapter_weights, device)?;
            let summary = merge_lora(&mut weights, tensors, &config)?;

            info!(
                model = %variant,
                merged = summary.merged,
                replaced = summary.replaced,
                rank = config.r,
                "Applied LoRA adapter"
            );
        }

        Self::from_tensors(variant, weights, &bert_config, head.hidden_size, &tokenizer_path, device)
    }

    fn from_tensors(
        variant: ModelVariant,
        weights: HashMap<String, Tensor>,
        bert_config: &BertConfig,
        hidden_size: usize,
        tokenizer_path: &Path,
        device: &Device,
    ) -> Result<Self, ClassifierError> {
        let prefixed = weights
            .keys()
            .any(|k| k.starts_with(&format!("{}.", BASE_PREFIX)));

        let vb = VarBuilder::from_tensors(weights, DType::F32, device);
        let encoder_vb = if prefixed { vb.pp(BASE_PREFIX) } else { vb.clone() };

        let model = BertModel::load(encoder_vb.clone(), bert_config)
            .map_err(load_err("Failed to build encoder"))?;
        let pooler = candle_nn::linear(hidden_size, hidden_size, encoder_vb.pp("pooler").pp("dense"))
            .map_err(load_err("Failed to build pooler"))?;
        let classifier = candle_nn::linear(hidden_size, NUM_CLASSES, vb.pp("classifier"))
            .map_err(load_err("Failed to build classification head"))?;

        let tokenizer = load_tokenizer(tokenizer_path)?;

        info!(model = %variant, device = device_name(device), "Model loaded successfully");

        Ok(Self {
            variant,
            model,
            pooler,
            classifier,
            tokenizer,
            device: device.clone(),
            device_name: device_name(device),
        })
    }

    fn batch_tensor<'a>(&self, rows: impl Iterator<Item = &'a [u32]>) -> candle_core::Result<Tensor> {
        let rows = rows
            .map(|row| Tensor::new(row, &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        Tensor::stack(&rows, 0)
    }

    fn forward(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ClassifierError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(predict_err)?;

        let input_ids = self
            .batch_tensor(encodings.iter().map(|e| e.get_ids()))
            .map_err(predict_err)?;
        let token_type_ids = self
            .batch_tensor(encodings.iter().map(|e| e.get_type_ids()))
            .map_err(predict_err)?;
        let attention_mask = self
            .batch_tensor(encodings.iter().map(|e| e.get_attention_mask()))
            .map_err(predict_err)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(predict_err)?;

        // Pool on the [CLS] position
        let logits = hidden
            .i((.., 0))
            .and_then(|cls| self.pooler.forward(&cls))
            .and_then(|pooled| pooled.tanh())
            .and_then(|pooled| self.classifier.forward(&pooled))
            .map_err(predict_err)?;

        candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|p| p.to_dtype(DType::F32))
            .and_then(|p| p.to_vec2::<f32>())
            .map_err(predict_err)
    }
}

/// Tokenizer with fixed truncation and padding to [`MAX_SEQUENCE_LENGTH`]
fn load_tokenizer(path: &Path) -> Result<Tokenizer, ClassifierError> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
        ClassifierError::load(format!("Failed to load tokenizer {}: {}", path.display(), e))
    })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(MAX_SEQUENCE_LENGTH),
        ..PaddingParams::default()
    }));

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQUENCE_LENGTH,
            ..TruncationParams::default()
        }))
        .map_err(|e| ClassifierError::load(format!("Invalid truncation settings: {}", e)))?;

    Ok(tokenizer)
}

impl TextClassifier for BertClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.variant, batch = texts.len(), "Starting prediction");

        let rows = self.forward(texts)?;
        let predictions = rows
            .iter()
            .map(|row| Prediction::from_probabilities(row))
            .collect::<Result<Vec<_>, _>>()?;

        for prediction in &predictions {
            debug!(
                model = %self.variant,
                leaning = %prediction.leaning,
                confidence = prediction.confidence,
                "Prediction completed"
            );
        }

        Ok(predictions)
    }

    fn variant(&self) -> ModelVariant {
        self.variant
    }

    fn device_name(&self) -> &str {
        self.device_name
    }
}
