//! Manifest loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RoutingConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for manifest loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Parse and validate a manifest from TOML text.
pub fn parse_config(content: &str) -> Result<RoutingConfig, ConfigError> {
    let config: RoutingConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate a manifest from a TOML file.
///
/// A relative cache directory is resolved against the manifest's directory.
pub fn load_config(path: &Path) -> Result<RoutingConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;

    if let (Some(dir), Some(base)) = (config.cache.dir.as_mut(), path.parent()) {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }

    tracing::info!(
        path = %path.display(),
        controllers = config.controllers.len(),
        cache_enabled = config.cache.dir.is_some(),
        "Routing manifest loaded"
    );
    Ok(config)
}
