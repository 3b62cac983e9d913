//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::HostConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates `kiln.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<HostConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<HostConfig, ConfigError> {
    let config: HostConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates values serde cannot check on its own.
fn validate_config(config: &HostConfig) -> Result<(), ConfigError> {
    let dep = &config.cache.dependency_dir;
    if dep.is_empty() {
        return Err(ConfigError::MissingField("cache.dependency_dir"));
    }
    if dep.contains('/') || dep.contains('\\') || dep == "." || dep == ".." {
        return Err(ConfigError::Invalid {
            field: "cache.dependency_dir",
            reason: format!("must be a single directory name, got '{dep}'"),
        });
    }
    Ok(())
}
