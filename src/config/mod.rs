//! Layered application configuration

mod app_config;
mod device;
mod profile;

pub use app_config::{
    AppConfig, FileLogConfig, InferenceConfig, LogFormat, LogRotation, LoggingConfig,
    MetricsConfig, ModelSpec, NewsConfig, ScraperConfig, ServerConfig, TrackingConfig,
};
pub use device::{Accelerators, DeviceKind, DevicePreference};
pub use profile::{ConfigError, PROFILE_VAR, Profile};
