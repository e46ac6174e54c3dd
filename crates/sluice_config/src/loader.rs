//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SluiceConfig;
use std::path::Path;

/// The file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "sluice.toml";

/// Loads and validates `<dir>/sluice.toml`.
pub fn load_config(dir: &Path) -> Result<SluiceConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SluiceConfig, ConfigError> {
    let config: SluiceConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SluiceConfig) -> Result<(), ConfigError> {
    let canon = &config.canonicalize;
    if canon.max_buffer_depth == Some(0) {
        return Err(ConfigError::ValidationError(
            "canonicalize.max_buffer_depth must be positive".to_string(),
        ));
    }
    if canon.max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "canonicalize.max_iterations must be positive".to_string(),
        ));
    }
    Ok(())
}
