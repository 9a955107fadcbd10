//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! versions::* and http::*
//!     → tracing events (resolution, preference writes, catalog swaps)
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
