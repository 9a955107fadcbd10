//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → VersionCatalog::from_config (default/uniqueness invariants)
//!     → AppConfig + VersionCatalog (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config and catalog
//!     → catalog sent to the server
//!     → CatalogHandle swaps it in atomically
//! ```
//!
//! # Design Decisions
//! - A catalog is immutable once built; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - A failed reload keeps the previous catalog
//! - Only `[versions]` reloads; other edits are logged as needing a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{build_catalog, load_config, parse_config, LoadError};
pub use schema::{AppConfig, CookieConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig, VersionsConfig};
