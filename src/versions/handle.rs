//! Publish-once, read-many slot for the active catalog.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::versions::catalog::VersionCatalog;
use crate::versions::context::RequestContext;
use crate::versions::error::VersionError;
use crate::versions::resolver::{self, ResolvedVersion};
use crate::versions::rewriter;

/// Shared handle to the published [`VersionCatalog`].
///
/// Empty until [`CatalogHandle::publish`] is called; every lookup made
/// before that fails with [`VersionError::NotConfigured`]. A reload swaps
/// in a whole new catalog, readers keep the one they already loaded.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: ArcSwapOption<VersionCatalog>,
}

impl CatalogHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle with `catalog` already published.
    pub fn with_catalog(catalog: VersionCatalog) -> Self {
        let handle = Self::new();
        handle.publish(catalog);
        handle
    }

    pub fn publish(&self, catalog: VersionCatalog) {
        tracing::info!(
            versions = catalog.descriptors().len(),
            default = %catalog.default_descriptor().name,
            mode = %catalog.addressing_mode(),
            persist_preference = catalog.persist_preference(),
            "Version catalog published"
        );
        self.current.store(Some(Arc::new(catalog)));
    }

    pub fn is_configured(&self) -> bool {
        self.current.load().is_some()
    }

    /// The catalog in effect right now.
    pub fn catalog(&self) -> Result<Arc<VersionCatalog>, VersionError> {
        self.current.load_full().ok_or(VersionError::NotConfigured)
    }

    pub fn resolve<C>(&self, request: &mut C) -> Result<ResolvedVersion, VersionError>
    where
        C: RequestContext + ?Sized,
    {
        let catalog = self.catalog()?;
        Ok(resolver::resolve(&catalog, request))
    }

    pub fn url_for_version(&self, target_name: &str, current_url: &str) -> Result<String, VersionError> {
        let catalog = self.catalog()?;
        rewriter::url_for_version(&catalog, target_name, current_url)
    }
}
