//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::versions::catalog::{AddressingMode, VersionDescriptor};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Configured versions and how they are addressed.
    pub versions: VersionsConfig,

    /// Cookie carrying the stored preference.
    pub cookie: CookieConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// True when sub-domain hosts would share one stored preference, which
    /// pins the bare host of the default version to the last explicit choice.
    pub fn shares_preference_across_hosts(&self) -> bool {
        self.versions.persist_preference
            && self.versions.addressing_mode == AddressingMode::SubDomain
            && self.cookie.domain.is_some()
    }

    /// Sections that differ from `other` and only take effect on restart.
    pub fn restart_required_sections(&self, other: &AppConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.listener != other.listener {
            changed.push("listener");
        }
        if self.cookie != other.cookie {
            changed.push("cookie");
        }
        if self.timeouts != other.timeouts {
            changed.push("timeouts");
        }
        if self.observability != other.observability {
            changed.push("observability");
        }
        changed
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The `[versions]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// Remember the last explicitly selected version on the client.
    pub persist_preference: bool,

    /// Query parameter or sub-domain addressing.
    pub addressing_mode: AddressingMode,

    /// Lifetime of the stored preference in days.
    pub preference_max_age_days: u64,

    /// Versions in display order.
    pub entries: Vec<VersionDescriptor>,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            persist_preference: false,
            addressing_mode: AddressingMode::QueryParam,
            preference_max_age_days: 365,
            entries: Vec::new(),
        }
    }
}

/// Preference cookie attributes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,

    /// `Domain` attribute. Unset means host-only, so each version host keeps
    /// its own preference.
    ///
    /// Do not share the cookie across version hosts in sub-domain mode with
    /// `persist_preference` on: the bare host of the default version carries
    /// no explicit candidate, so the shared preference always wins there and
    /// the default version becomes unreachable once another one was chosen.
    pub domain: Option<String>,

    /// Add the `Secure` attribute.
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "version".to_string(),
            domain: None,
            secure: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of the human readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
