//! Client-held version preference.
//!
//! The hosting layer decides where the value lives (a cookie for HTTP, a
//! plain field for offline tools). Reads happen before resolution, writes
//! after it.

use std::time::Duration;

/// Read/write access to the single stored preference of one client.
pub trait PreferenceStore {
    /// The stored value, if any.
    fn load(&self) -> Option<String>;

    /// Replace the stored value, valid for `max_age`.
    fn store(&mut self, value: &str, max_age: Duration);
}

/// In-memory preference, used by the CLI and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreference {
    value: Option<String>,
    max_age: Option<Duration>,
    writes: usize,
}

impl MemoryPreference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a value already stored.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Expiry given by the last write.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Number of `store` calls seen.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryPreference {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn store(&mut self, value: &str, max_age: Duration) {
        self.value = Some(value.to_string());
        self.max_age = Some(max_age);
        self.writes += 1;
    }
}
