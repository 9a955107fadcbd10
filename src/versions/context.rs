//! Per-request view consumed by the resolver.

use url::Url;

use crate::versions::preference::{MemoryPreference, PreferenceStore};

/// What the resolver needs from the hosting layer for one request.
pub trait RequestContext: PreferenceStore {
    /// Decoded value of a query parameter.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Request host without port.
    fn host(&self) -> Option<&str>;

    /// Full request URL: scheme, host, path and query.
    fn url(&self) -> &str;
}

/// A request described by a URL string and an in-memory preference.
#[derive(Debug, Clone)]
pub struct StaticRequest {
    url: Url,
    serialized: String,
    pub preference: MemoryPreference,
}

impl StaticRequest {
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url)?;
        Ok(Self {
            serialized: url.to_string(),
            url,
            preference: MemoryPreference::new(),
        })
    }

    pub fn with_preference(mut self, value: impl Into<String>) -> Self {
        self.preference = MemoryPreference::with_value(value);
        self
    }
}

impl PreferenceStore for StaticRequest {
    fn load(&self) -> Option<String> {
        self.preference.load()
    }

    fn store(&mut self, value: &str, max_age: std::time::Duration) {
        self.preference.store(value, max_age)
    }
}

impl RequestContext for StaticRequest {
    fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    fn url(&self) -> &str {
        &self.serialized
    }
}
