//! Data for a version switcher widget.

use serde::Serialize;

use crate::versions::catalog::VersionCatalog;
use crate::versions::error::VersionError;
use crate::versions::resolver::ResolvedVersion;
use crate::versions::rewriter::url_for_version;

/// One entry of the switcher, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitcherEntry {
    pub name: String,
    pub caption: String,
    /// Rendered as a plain label rather than a link.
    pub is_current: bool,
    pub switch_url: String,
}

/// Build the switcher entries for the resolved version.
pub fn entries(
    catalog: &VersionCatalog,
    current: &ResolvedVersion,
    current_url: &str,
) -> Result<Vec<SwitcherEntry>, VersionError> {
    catalog
        .descriptors()
        .iter()
        .map(|descriptor| {
            Ok(SwitcherEntry {
                name: descriptor.name.clone(),
                caption: descriptor.caption.clone(),
                is_current: descriptor.name == current.name,
                switch_url: url_for_version(catalog, &descriptor.name, current_url)?,
            })
        })
        .collect()
}
