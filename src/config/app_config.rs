use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::device::{DeviceKind, DevicePreference};
use super::profile::{ConfigError, PROFILE_VAR, Profile};
use crate::domain::classifier::ModelVariant;

const DEFAULT_MODEL_DIR: &str = "models/bert";
const DEFAULT_WEIGHTS_FILE: &str = "model.safetensors";
const MAX_ARTICLES_LIMIT: usize = 5;

/// Flat variables honored for compatibility with older deployments.
/// They take precedence over file and `APP__*` sources.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("MODEL_PATH", "inference.models.bert.weights_path"),
    ("NEWS_API_KEY", "news.api_key"),
    ("MLFLOW_URI", "tracking.uri"),
    ("EXPERIMENT_NAME", "tracking.experiment_name"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
];

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub reload: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub file: FileLogConfig,
}

/// Rolling log file named after the active profile, e.g. `logs/production.log`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileLogConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    pub rotation: LogRotation,
    /// Rotated files kept on disk; older ones are deleted
    pub max_files: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub device: DevicePreference,
    /// Set by [`InferenceConfig::resolve_device`]
    #[serde(skip_deserializing)]
    pub resolved_device: Option<DeviceKind>,
    /// Falls back to `bert`, or to the only configured model
    pub default_model: Option<ModelVariant>,
    /// `bert` from `models/bert` when no entry is configured
    pub models: HashMap<ModelVariant, ModelSpec>,
}

/// On-disk artifacts of one served model.
///
/// `config.json` and `tokenizer.json` default to siblings of the weights file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelSpec {
    pub weights_path: PathBuf,
    #[serde(default)]
    pub config_path: Option<PathBuf>,
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,
    #[serde(default)]
    pub adapter_path: Option<PathBuf>,
    #[serde(default)]
    pub adapter_config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_articles: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Experiment tracking; `/model/metrics` is served only when both are set
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub uri: Option<String>,
    pub experiment_name: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            reload: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            file: FileLogConfig::default(),
        }
    }
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("logs"),
            rotation: LogRotation::default(),
            max_files: 7,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert(ModelVariant::Bert, ModelSpec::in_dir(DEFAULT_MODEL_DIR));

        Self {
            device: DevicePreference::default(),
            resolved_device: None,
            default_model: None,
            models,
        }
    }
}

impl InferenceConfig {
    pub fn default_variant(&self) -> Option<ModelVariant> {
        match self.default_model {
            Some(variant) => Some(variant),
            None if self.models.contains_key(&ModelVariant::Bert) => Some(ModelVariant::Bert),
            None if self.models.len() == 1 => self.models.keys().next().copied(),
            None => None,
        }
    }

    /// Probe accelerators once; warns when the requested one is missing
    pub fn resolve_device(&mut self) -> DeviceKind {
        let kind = self.device.resolve();
        self.resolved_device = Some(kind);
        kind
    }

    /// Resolved device, probing now if [`Self::resolve_device`] was not called
    pub fn device_kind(&self) -> DeviceKind {
        self.resolved_device
            .unwrap_or_else(|| self.device.resolve())
    }
}

impl ModelSpec {
    /// Conventional file names inside a model directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::from_weights(dir.into().join(DEFAULT_WEIGHTS_FILE))
    }

    pub fn from_weights(weights_path: impl Into<PathBuf>) -> Self {
        Self {
            weights_path: weights_path.into(),
            config_path: None,
            tokenizer_path: None,
            adapter_path: None,
            adapter_config_path: None,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.sibling("config.json"))
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.tokenizer_path
            .clone()
            .unwrap_or_else(|| self.sibling("tokenizer.json"))
    }

    /// Adapter config defaults to `adapter_config.json` next to the adapter weights
    pub fn adapter_config_path(&self) -> Option<PathBuf> {
        self.adapter_config_path.clone().or_else(|| {
            self.adapter_path
                .as_ref()
                .map(|p| p.with_file_name("adapter_config.json"))
        })
    }

    pub fn has_adapter(&self) -> bool {
        self.adapter_path.is_some()
    }

    fn sibling(&self, file_name: &str) -> PathBuf {
        self.weights_path.with_file_name(file_name)
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".to_string(),
            api_key: None,
            max_articles: 5,
            timeout_secs: 30,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("political-leaning-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            uri: None,
            experiment_name: None,
            timeout_secs: 30,
        }
    }
}

impl TrackingConfig {
    /// Tracking URI and experiment name, when both are configured
    pub fn target(&self) -> Option<(&str, &str)> {
        match (self.uri.as_deref(), self.experiment_name.as_deref()) {
            (Some(uri), Some(name)) if !uri.trim().is_empty() && !name.trim().is_empty() => {
                Some((uri, name))
            }
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load from the process environment and the optional `config/` files
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(
            |name| std::env::var(name).ok(),
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Load with an explicit variable lookup and `APP__*` source
    pub fn load_with<F>(lookup: F, env: config::Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = Profile::from_env_value(lookup(PROFILE_VAR))?;

        let mut builder = config::Config::builder()
            .set_default("debug", profile.debug())?
            .set_default("server.reload", profile.reload())?
            .set_default("logging.level", profile.default_log_level())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", profile)).required(false))
            .add_source(env)
            .set_override("profile", profile.as_str())?;

        for (var, key) in LEGACY_VARS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.inference.models.is_empty() {
            return Err(ConfigError::Invalid("no models configured".to_string()));
        }

        match self.inference.default_variant() {
            None => {
                return Err(ConfigError::Invalid(
                    "several models configured; set inference.default_model".to_string(),
                ));
            }
            Some(variant) if !self.inference.models.contains_key(&variant) => {
                return Err(ConfigError::Invalid(format!(
                    "default model '{}' has no configuration",
                    variant
                )));
            }
            Some(_) => {}
        }

        if !(1..=MAX_ARTICLES_LIMIT).contains(&self.news.max_articles) {
            return Err(ConfigError::Invalid(format!(
                "news.max_articles must be between 1 and {}",
                MAX_ARTICLES_LIMIT
            )));
        }

        Ok(())
    }

    /// JSON view with secrets masked
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);

        if let Some(key) = value.pointer_mut("/news/api_key") {
            if !key.is_null() {
                *key = serde_json::Value::String("[REDACTED]".to_string());
            }
        }

        value
    }
}
