//! Page version resolution subsystem.
//!
//! # Data Flow
//! ```text
//! [versions] config
//!     → catalog.rs (validate, freeze as VersionCatalog)
//!     → handle.rs (publish once, swap on reload)
//!
//! Per request:
//!     RequestContext (query, host, url, preference)
//!     → resolver.rs (explicit → preference → default)
//!     → preference.rs (write back when persistence is on)
//!     → ResolvedVersion
//!
//! Switch links:
//!     ResolvedVersion + current url
//!     → rewriter.rs (query fragment or sub-domain rewrite)
//!     → switcher.rs (one entry per version, catalog order)
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod handle;
pub mod preference;
pub mod resolver;
pub mod rewriter;
pub mod switcher;

pub use catalog::{AddressingMode, VersionCatalog, VersionDescriptor};
pub use context::{RequestContext, StaticRequest};
pub use error::{ConfigError, VersionError};
pub use handle::CatalogHandle;
pub use preference::{MemoryPreference, PreferenceStore};
pub use resolver::{resolve, ResolutionSource, ResolvedVersion, VERSION_PARAM};
pub use rewriter::{subdomain_of, url_for_version};
pub use switcher::SwitcherEntry;
