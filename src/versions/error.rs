//! Error types for catalog construction and version lookups.

use thiserror::Error;

/// Catalog construction failure. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no version is marked as default")]
    NoDefault,

    #[error("more than one version is marked as default: {0:?}")]
    MultipleDefaults(Vec<String>),

    #[error("duplicate version {field}: {value}")]
    DuplicateKey { field: &'static str, value: String },
}

/// Failure while resolving a version or generating a switch URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Called before any catalog was published.
    #[error("version catalog has not been configured")]
    NotConfigured,

    #[error("unknown version: {0}")]
    UnknownVersion(String),
}
