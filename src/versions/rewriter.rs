//! Version switch URLs.
//!
//! # Addressing Modes
//! ```text
//! query_param:  "?version=<token>"          (caller appends to current path)
//! sub_domain:   https://example.com/page    → https://v2.example.com/page
//!               https://v2.example.com/page → https://example.com/page   (default)
//! ```
//!
//! # Known Limitation
//! The sub-domain rewrite is a textual substitution on the first `//`
//! (no current sub-domain) or the first `//<sub>.` (current sub-domain).
//! It assumes that sequence appears only in the authority. URLs carrying
//! userinfo (`https://user@v2.example.com`) or an earlier `//<sub>.`
//! come back unchanged or rewritten in the wrong place.
//!
//! Sub-domain detection treats the first of three or more host labels as
//! the sub-domain, so two-label public suffixes (`example.co.uk`) and IPv4
//! hosts are misread.

use url::Url;

use crate::versions::catalog::{AddressingMode, VersionCatalog};
use crate::versions::error::VersionError;
use crate::versions::resolver::VERSION_PARAM;

/// First label of a host with at least three labels.
pub fn subdomain_of(host: &str) -> Option<&str> {
    let mut labels = host.split('.');
    let first = labels.next()?;
    if labels.count() < 2 {
        return None;
    }
    Some(first)
}

/// URL that activates `target_name` when visited from `current_url`.
pub fn url_for_version(
    catalog: &VersionCatalog,
    target_name: &str,
    current_url: &str,
) -> Result<String, VersionError> {
    let target = catalog
        .find_by_name(target_name)
        .ok_or_else(|| VersionError::UnknownVersion(target_name.to_string()))?;

    if catalog.addressing_mode() == AddressingMode::QueryParam {
        return Ok(format!("?{}={}", VERSION_PARAM, target.url_token));
    }

    // The default version is served without a sub-domain.
    let new_label = if target.is_default {
        String::new()
    } else {
        format!("{}.", target.url_token)
    };

    // Work on the normalised form so the host matches what `host_str` reports
    // (lowercase, punycode). Unparseable input is rewritten as given.
    let parsed = Url::parse(current_url).ok();
    let current_host = parsed.as_ref().and_then(Url::host_str);
    let source = parsed.as_ref().map_or(current_url, Url::as_str);

    let rewritten = match current_host.and_then(subdomain_of) {
        None => source.replacen("//", &format!("//{new_label}"), 1),
        Some(current) => source.replacen(&format!("//{current}."), &format!("//{new_label}"), 1),
    };

    Ok(rewritten)
}
