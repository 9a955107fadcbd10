//! Version resolution for a single request.
//!
//! # Precedence
//! ```text
//! 1. explicit candidate   ?version=<token>  or  <token>.example.com
//!    (valid → persisted when enabled)
//! 2. stored preference    only when persistence is enabled
//! 3. catalog default
//! ```
//!
//! # Design Decisions
//! - Unknown tokens and stale preferences fall through, never error
//! - The only side effect is the preference write in step 1

use serde::Serialize;

use crate::versions::catalog::{AddressingMode, VersionCatalog};
use crate::versions::context::RequestContext;
use crate::versions::rewriter::subdomain_of;

/// Query parameter carrying the url token in query mode.
pub const VERSION_PARAM: &str = "version";

/// Which signal decided the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Explicit,
    Preference,
    Default,
}

/// The version chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    /// `name` of the chosen descriptor.
    pub name: String,
    pub source: ResolutionSource,
}

impl ResolvedVersion {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Pick the active version for `request`.
pub fn resolve<C>(catalog: &VersionCatalog, request: &mut C) -> ResolvedVersion
where
    C: RequestContext + ?Sized,
{
    let candidate = match catalog.addressing_mode() {
        AddressingMode::QueryParam => request.query_param(VERSION_PARAM),
        AddressingMode::SubDomain => request.host().and_then(subdomain_of).map(str::to_string),
    };

    if let Some(descriptor) = candidate.as_deref().and_then(|t| catalog.find_by_url_token(t)) {
        if catalog.persist_preference() {
            tracing::debug!(version = %descriptor.name, "Storing version preference");
            request.store(&descriptor.name, catalog.preference_max_age());
        }
        return resolved(&descriptor.name, ResolutionSource::Explicit);
    }

    if catalog.persist_preference() {
        if let Some(stored) = request.load() {
            if let Some(descriptor) = catalog.find_by_name(&stored) {
                return resolved(&descriptor.name, ResolutionSource::Preference);
            }
            tracing::debug!(preference = %stored, "Ignoring unknown stored version");
        }
    }

    resolved(&catalog.default_descriptor().name, ResolutionSource::Default)
}

fn resolved(name: &str, source: ResolutionSource) -> ResolvedVersion {
    tracing::debug!(version = %name, source = ?source, "Resolved version");
    ResolvedVersion {
        name: name.to_string(),
        source,
    }
}
