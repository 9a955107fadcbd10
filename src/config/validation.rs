//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Tokens must be usable both as a query value and a host label
//! - Names must fit in a cookie value
//! - Validate value ranges (max age > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Default/uniqueness invariants belong to `VersionCatalog::build`

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check everything serde cannot.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.versions.entries.is_empty() {
        errors.push(ValidationError::new("versions.entries", "at least one version is required"));
    }

    for (i, entry) in config.versions.entries.iter().enumerate() {
        let field = |name: &str| format!("versions.entries[{}].{}", i, name);

        if entry.url_token.is_empty() {
            errors.push(ValidationError::new(field("url_token"), "must not be empty"));
        } else if !is_token_safe(&entry.url_token) {
            errors.push(ValidationError::new(
                field("url_token"),
                format!("{:?} may only contain ASCII letters, digits, '-' and '_'", entry.url_token),
            ));
        }

        if entry.name.is_empty() {
            errors.push(ValidationError::new(field("name"), "must not be empty"));
        } else if !is_cookie_safe(&entry.name) {
            errors.push(ValidationError::new(
                field("name"),
                format!("{:?} cannot be stored in a cookie", entry.name),
            ));
        }

        if entry.caption.trim().is_empty() {
            errors.push(ValidationError::new(field("caption"), "must not be empty"));
        }
    }

    if config.versions.preference_max_age_days == 0 {
        errors.push(ValidationError::new("versions.preference_max_age_days", "must be > 0"));
    }

    if config.cookie.name.is_empty() || !is_token_safe(&config.cookie.name) {
        errors.push(ValidationError::new(
            "cookie.name",
            format!("invalid cookie name {:?}", config.cookie.name),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_token_safe(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// RFC 6265 cookie-octet
fn is_cookie_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}
