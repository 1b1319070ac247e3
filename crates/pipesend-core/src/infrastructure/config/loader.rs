use std::path::{
    Path,
    PathBuf,
};

use pipesend_api::ExportError;
use thiserror::Error;

use super::interpolation::{
    expand_env,
    InterpolationError,
};
use crate::domain::ExportConfig;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

impl From<ConfigLoadError> for ExportError {
    fn from(err: ConfigLoadError) -> Self {
        ExportError::Configuration(err.to_string())
    }
}

/// Reads export stage settings from TOML
///
/// `${VAR}` references are expanded before parsing so URLs and secret names
/// can come from the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> ConfigLoadResult<ExportConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading export config");
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigLoadResult<ExportConfig> {
        let expanded = expand_env(content)?;
        let config: ExportConfig = toml::from_str(&expanded)?;

        if config.url.trim().is_empty() {
            return Err(ConfigLoadError::InvalidConfig(
                "Destination url cannot be empty".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn to_toml_string(config: &ExportConfig) -> ConfigLoadResult<String> {
        toml::to_string_pretty(config)
            .map_err(|e| ConfigLoadError::InvalidConfig(format!("Failed to serialize: {}", e)))
    }
}
