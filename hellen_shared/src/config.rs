//! Loading and saving the engine configuration record.

use std::path::Path;

use thiserror::Error;

use crate::engine_config::EngineConfiguration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Deserializes a configuration record. Missing fields take their defaults,
/// so the result is not necessarily valid yet; see [`validate_config`].
pub fn parse_config(contents: &str) -> Result<EngineConfiguration, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Checks a fully assembled record, after board overrides have been applied.
pub fn validate_config(config: &EngineConfiguration) -> Result<(), ConfigError> {
    config.validate().map_err(ConfigError::Invalid)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfiguration, ConfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse engine configuration {}: {}", path.display(), e);
                Err(e)
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path.display(), e);
            Err(ConfigError::Io(e))
        }
    }
}

pub fn to_toml(config: &EngineConfiguration) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

pub fn to_json(config: &EngineConfiguration) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(config)?)
}

pub fn save_config(path: impl AsRef<Path>, config: &EngineConfiguration) -> Result<(), ConfigError> {
    let path = path.as_ref();
    std::fs::write(path, to_toml(config)?)?;
    tracing::debug!("Saved engine configuration to {}", path.display());
    Ok(())
}
