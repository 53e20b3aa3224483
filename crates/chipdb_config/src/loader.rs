//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ChipDbConfig;
use std::path::Path;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "chipdb.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ChipDbConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Loads an explicitly named configuration file, or the default one if it
/// exists, or falls back to built-in defaults.
pub fn load_config_or_default(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<ChipDbConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default = dir.join(DEFAULT_CONFIG_FILE);
    if default.is_file() {
        load_config(&default)
    } else {
        Ok(ChipDbConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ChipDbConfig, ConfigError> {
    let config: ChipDbConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ChipDbConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.database.root {
        if root.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.root must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
