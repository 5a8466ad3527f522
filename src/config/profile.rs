//! Named environment profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the active profile
pub const PROFILE_VAR: &str = "APP_ENV";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{var}' is not set; expected one of: development, staging, production")]
    MissingProfile { var: &'static str },

    #[error("Configuration for environment '{name}' not found")]
    UnknownProfile { name: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

/// Deployment profile; exactly one is active per process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Staging,
    Production,
}

impl Profile {
    /// Resolve the profile from the raw value of [`PROFILE_VAR`]
    pub fn from_env_value(value: Option<String>) -> Result<Self, ConfigError> {
        let value = value.map(|v| v.trim().to_string()).unwrap_or_default();

        if value.is_empty() {
            return Err(ConfigError::MissingProfile { var: PROFILE_VAR });
        }

        value.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Verbose logging and debug payloads
    pub fn debug(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Auto-reload hint for local runs
    pub fn reload(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn default_log_level(&self) -> &'static str {
        if self.debug() { "debug" } else { "info" }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownProfile {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_profiles() {
        assert_eq!(
            Profile::from_env_value(Some("development".into())).unwrap(),
            Profile::Development
        );
        assert_eq!(
            Profile::from_env_value(Some(" staging ".into())).unwrap(),
            Profile::Staging
        );
        assert_eq!(
            Profile::from_env_value(Some("PRODUCTION".into())).unwrap(),
            Profile::Production
        );
        assert_eq!("prod".parse::<Profile>().unwrap(), Profile::Production);
    }

    #[test]
    fn test_unknown_profile_names_the_profile() {
        let err = Profile::from_env_value(Some("qa".into())).unwrap_err();

        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "qa"));
        assert_eq!(err.to_string(), "Configuration for environment 'qa' not found");
    }

    #[test]
    fn test_missing_or_blank_profile() {
        assert!(matches!(
            Profile::from_env_value(None),
            Err(ConfigError::MissingProfile { .. })
        ));
        assert!(matches!(
            Profile::from_env_value(Some("   ".into())),
            Err(ConfigError::MissingProfile { .. })
        ));
    }

    #[test]
    fn test_profile_overrides() {
        assert!(Profile::Development.debug());
        assert!(Profile::Development.reload());
        assert!(Profile::Staging.debug());
        assert!(!Profile::Staging.reload());
        assert!(!Profile::Production.debug());
        assert!(!Profile::Production.reload());
        assert_eq!(Profile::Production.default_log_level(), "info");
    }
}
