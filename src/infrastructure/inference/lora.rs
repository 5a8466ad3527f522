//! LoRA adapter merging.
//!
//! Adapters are folded into the base weights at load time, so inference runs
//! the plain architecture: `W' = W + scaling * B·A` for every adapted linear
//! layer, with `scaling = lora_alpha / r` (or `lora_alpha / sqrt(r)` for
//! rank-stabilized adapters).

use std::collections::HashMap;
use std::path::Path;

use candle_core::Tensor;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::domain::ClassifierError;

const PEFT_PREFIX: &str = "base_model.model.";

/// Subset of a PEFT `adapter_config.json` needed to merge weights
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdapterConfig {
    pub r: usize,
    pub lora_alpha: f64,
    #[serde(default)]
    pub target_modules: TargetModules,
    #[serde(default)]
    pub use_rslora: bool,
}

/// Modules an adapter may touch: a list of module names or a full-match regex
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TargetModules {
    Names(Vec<String>),
    Pattern(String),
}

impl Default for TargetModules {
    fn default() -> Self {
        Self::Names(Vec::new())
    }
}

enum TargetMatcher {
    Any,
    Names(Vec<String>),
    Pattern(Regex),
}

impl TargetMatcher {
    fn new(targets: &TargetModules) -> Result<Self, ClassifierError> {
        match targets {
            TargetModules::Names(names) if names.is_empty() => Ok(Self::Any),
            TargetModules::Names(names) => Ok(Self::Names(names.clone())),
            TargetModules::Pattern(p) if p == "all-linear" => Ok(Self::Any),
            TargetModules::Pattern(p) => Regex::new(&format!("^(?:{})$", p))
                .map(Self::Pattern)
                .map_err(|e| ClassifierError::load(format!("invalid target_modules '{}': {}", p, e))),
        }
    }

    /// Names match the module itself or its last path segments
    fn matches(&self, module: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Names(names) => names
                .iter()
                .any(|n| module == n || module.ends_with(&format!(".{}", n))),
            Self::Pattern(re) => re.is_match(module),
        }
    }
}

impl AdapterConfig {
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::load(format!("{}: {}", path.display(), e)))?;

        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            ClassifierError::load(format!("Invalid adapter config {}: {}", path.display(), e))
        })?;

        if config.r == 0 {
            return Err(ClassifierError::load("adapter rank 'r' must be positive"));
        }

        Ok(config)
    }

    pub fn scaling(&self) -> f64 {
        if self.use_rslora {
            self.lora_alpha / (self.r as f64).sqrt()
        } else {
            self.lora_alpha / self.r as f64
        }
    }
}

/// Counts of what an adapter contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub merged: usize,
    pub replaced: usize,
}

enum AdapterEntry {
    LoraA(String),
    LoraB(String),
    Replacement(String),
    Skip,
}

fn classify(key: &str) -> Result<AdapterEntry, ClassifierError> {
    let key = key.strip_prefix(PEFT_PREFIX).unwrap_or(key);

    if key.contains("lora_embedding_") || key.contains("lora_magnitude_") {
        return Err(ClassifierError::load(format!(
            "unsupported adapter tensor '{}'",
            key
        )));
    }

    if let Some(idx) = key.find(".lora_A") {
        return Ok(AdapterEntry::LoraA(key[..idx].to_string()));
    }

    if let Some(idx) = key.find(".lora_B") {
        return Ok(AdapterEntry::LoraB(key[..idx].to_string()));
    }

    if key.contains(".original_module.") {
        return Ok(AdapterEntry::Skip);
    }

    Ok(AdapterEntry::Replacement(
        key.replace(".modules_to_save.default", "")
            .replace(".modules_to_save", ""),
    ))
}

fn candle_err(e: candle_core::Error) -> ClassifierError {
    ClassifierError::load(format!("adapter merge failed: {}", e))
}

/// Merge adapter tensors into `weights` in place
pub fn merge_lora(
    weights: &mut HashMap<String, Tensor>,
    adapter: HashMap<String, Tensor>,
    config: &AdapterConfig,
) -> Result<MergeSummary, ClassifierError> {
    let scaling = config.scaling();
    let targets = TargetMatcher::new(&config.target_modules)?;
    let mut pairs: HashMap<String, (Option<Tensor>, Option<Tensor>)> = HashMap::new();
    let mut summary = MergeSummary::default();

    for (key, tensor) in adapter {
        match classify(&key)? {
            AdapterEntry::LoraA(module) => pairs.entry(module).or_default().0 = Some(tensor),
            AdapterEntry::LoraB(module) => pairs.entry(module).or_default().1 = Some(tensor),
            AdapterEntry::Replacement(base_key) => {
                weights.insert(base_key, tensor);
                summary.replaced += 1;
            }
            AdapterEntry::Skip => {}
        }
    }

    for (module, pair) in pairs {
        let (Some(a), Some(b)) = pair else {
            return Err(ClassifierError::load(format!(
                "incomplete LoRA pair for '{}'",
                module
            )));
        };

        if !targets.matches(&module) {
            return Err(ClassifierError::load(format!(
                "LoRA module '{}' is not listed in target_modules",
                module
            )));
        }

        let key = format!("{}.weight", module);
        let base = weights.get(&key).ok_or_else(|| {
            ClassifierError::load(format!("LoRA target '{}' not found in base weights", key))
        })?;

        let delta = b
            .matmul(&a)
            .and_then(|d| d.affine(scaling, 0.0))
            .and_then(|d| d.to_dtype(base.dtype()))
            .map_err(candle_err)?;

        if delta.dims() != base.dims() {
            return Err(ClassifierError::load(format!(
                "LoRA delta shape {:?} does not match '{}' shape {:?}",
                delta.dims(),
                key,
                base.dims()
            )));
        }

        let merged = base.add(&delta).map_err(candle_err)?;
        debug!(target_module = %module, "Merged LoRA weights");

        weights.insert(key, merged);
        summary.merged += 1;
    }

    Ok(summary)
}
