//! The immutable registry of configured versions.
//!
//! # Responsibilities
//! - Hold descriptors in display order
//! - Enforce exactly one default and unique names/url tokens
//! - Lookup by name and by url token
//!
//! # Design Decisions
//! - Built once from configuration, never mutated afterwards
//! - Lookups are linear scans; catalogs hold a handful of entries

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::schema::VersionsConfig;
use crate::versions::error::ConfigError;

/// Default lifetime of the stored preference (one year).
pub const DEFAULT_PREFERENCE_MAX_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// One configured version of the site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionDescriptor {
    /// Token carried in the query string or sub-domain.
    pub url_token: String,

    /// Canonical identifier used for lookups and the stored preference.
    pub name: String,

    /// Label shown in the version switcher.
    pub caption: String,

    #[serde(default)]
    pub is_default: bool,
}

impl VersionDescriptor {
    pub fn new(
        url_token: impl Into<String>,
        name: impl Into<String>,
        caption: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            url_token: url_token.into(),
            name: name.into(),
            caption: caption.into(),
            is_default,
        }
    }
}

/// Where the version selection travels in a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// `?version=<token>`
    #[default]
    QueryParam,
    /// `<token>.example.com`
    SubDomain,
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressingMode::QueryParam => write!(f, "query_param"),
            AddressingMode::SubDomain => write!(f, "sub_domain"),
        }
    }
}

/// Validated, read-only set of versions.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    descriptors: Vec<VersionDescriptor>,
    default_index: usize,
    persist_preference: bool,
    addressing_mode: AddressingMode,
    preference_max_age: Duration,
}

impl VersionCatalog {
    /// Build a catalog, checking the default and uniqueness invariants.
    pub fn build(
        descriptors: Vec<VersionDescriptor>,
        persist_preference: bool,
        addressing_mode: AddressingMode,
    ) -> Result<Self, ConfigError> {
        let defaults: Vec<usize> = descriptors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_default)
            .map(|(i, _)| i)
            .collect();

        let default_index = match defaults.as_slice() {
            [] => return Err(ConfigError::NoDefault),
            [index] => *index,
            many => {
                return Err(ConfigError::MultipleDefaults(
                    many.iter().map(|&i| descriptors[i].name.clone()).collect(),
                ))
            }
        };

        let mut names = HashSet::new();
        let mut tokens = HashSet::new();
        for descriptor in &descriptors {
            if !names.insert(descriptor.name.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    field: "name",
                    value: descriptor.name.clone(),
                });
            }
            if !tokens.insert(descriptor.url_token.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    field: "url_token",
                    value: descriptor.url_token.clone(),
                });
            }
        }

        Ok(Self {
            descriptors,
            default_index,
            persist_preference,
            addressing_mode,
            preference_max_age: DEFAULT_PREFERENCE_MAX_AGE,
        })
    }

    /// Build a catalog from the `[versions]` configuration section.
    pub fn from_config(config: &VersionsConfig) -> Result<Self, ConfigError> {
        let catalog = Self::build(
            config.entries.clone(),
            config.persist_preference,
            config.addressing_mode,
        )?;
        Ok(catalog.with_preference_max_age(Duration::from_secs(
            config.preference_max_age_days.saturating_mul(24 * 60 * 60),
        )))
    }

    /// Override how long a written preference stays valid.
    pub fn with_preference_max_age(mut self, max_age: Duration) -> Self {
        self.preference_max_age = max_age;
        self
    }

    pub fn find_by_name(&self, name: &str) -> Option<&VersionDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn find_by_url_token(&self, token: &str) -> Option<&VersionDescriptor> {
        self.descriptors.iter().find(|d| d.url_token == token)
    }

    pub fn default_descriptor(&self) -> &VersionDescriptor {
        &self.descriptors[self.default_index]
    }

    /// Descriptors in display order.
    pub fn descriptors(&self) -> &[VersionDescriptor] {
        &self.descriptors
    }

    pub fn persist_preference(&self) -> bool {
        self.persist_preference
    }

    pub fn addressing_mode(&self) -> AddressingMode {
        self.addressing_mode
    }

    pub fn preference_max_age(&self) -> Duration {
        self.preference_max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<VersionDescriptor> {
        vec![
            VersionDescriptor::new("v1", "Version1", "Version 1", true),
            VersionDescriptor::new("v2", "Version2", "Version 2", false),
        ]
    }

    #[test]
    fn test_build_and_lookup() {
        let catalog = VersionCatalog::build(descriptors(), true, AddressingMode::SubDomain).unwrap();

        assert_eq!(catalog.default_descriptor().name, "Version1");
        assert_eq!(catalog.find_by_name("Version2").unwrap().url_token, "v2");
        assert_eq!(catalog.find_by_url_token("v2").unwrap().name, "Version2");
        assert!(catalog.find_by_name("v2").is_none());
        assert!(catalog.find_by_url_token("Version2").is_none());
        assert_eq!(catalog.descriptors().len(), 2);
        assert_eq!(catalog.preference_max_age(), DEFAULT_PREFERENCE_MAX_AGE);
    }

    #[test]
    fn test_no_default() {
        let mut list = descriptors();
        list[0].is_default = false;
        let err = VersionCatalog::build(list, false, AddressingMode::QueryParam).unwrap_err();
        assert_eq!(err, ConfigError::NoDefault);

        let err = VersionCatalog::build(Vec::new(), false, AddressingMode::QueryParam).unwrap_err();
        assert_eq!(err, ConfigError::NoDefault);
    }

    #[test]
    fn test_multiple_defaults() {
        let mut list = descriptors();
        list[1].is_default = true;
        let err = VersionCatalog::build(list, false, AddressingMode::QueryParam).unwrap_err();
        assert!(matches!(err, ConfigError::MultipleDefaults(ref names) if names.len() == 2));
    }

    #[test]
    fn test_duplicate_keys() {
        let mut list = descriptors();
        list[1].name = "Version1".into();
        let err = VersionCatalog::build(list, false, AddressingMode::QueryParam).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateKey { field: "name", value: "Version1".into() }
        );

        let mut list = descriptors();
        list[1].url_token = "v1".into();
        let err = VersionCatalog::build(list, false, AddressingMode::QueryParam).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateKey { field: "url_token", value: "v1".into() }
        );
    }

    #[test]
    fn test_addressing_mode_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: AddressingMode,
        }
        let w: Wrapper = toml::from_str("mode = \"sub_domain\"").unwrap();
        assert_eq!(w.mode, AddressingMode::SubDomain);
        let w: Wrapper = toml::from_str("mode = \"query_param\"").unwrap();
        assert_eq!(w.mode, AddressingMode::QueryParam);
    }
}
