//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware.rs (resolve version against the published catalog)
//!         → context.rs (query, host, url, preference cookie)
//!     → page handler (resolved version + switcher entries as JSON)
//!     → Set-Cookie appended when the preference changed
//! ```

pub mod context;
pub mod middleware;
pub mod server;

pub use context::HttpRequestContext;
pub use middleware::{version_middleware, ActiveCatalog, CurrentUrl, VersionState};
pub use server::HttpServer;
