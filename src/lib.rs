//! Per-request page version resolution and version switch links.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod versions;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use versions::{CatalogHandle, VersionCatalog};
