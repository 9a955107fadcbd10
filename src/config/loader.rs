//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::versions::{ConfigError, VersionCatalog};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Catalog(ConfigError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            LoadError::Catalog(e) => write!(f, "Invalid version catalog: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::Catalog(e) => Some(e),
            LoadError::Validation(_) => None,
        }
    }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig, LoadError> {
    let config: AppConfig = toml::from_str(content).map_err(LoadError::Parse)?;

    validate_config(&config).map_err(LoadError::Validation)?;
    // Surface catalog invariants at load time, not on first request.
    build_catalog(&config)?;

    if config.shares_preference_across_hosts() {
        tracing::warn!(
            domain = ?config.cookie.domain,
            "Preference cookie is shared across version hosts; the default version \
             becomes unreachable once another version has been chosen"
        );
    }

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(LoadError::Io)?;
    parse_config(&content)
}

/// Build the version catalog described by `config`.
pub fn build_catalog(config: &AppConfig) -> Result<VersionCatalog, LoadError> {
    VersionCatalog::from_config(&config.versions).map_err(LoadError::Catalog)
}
