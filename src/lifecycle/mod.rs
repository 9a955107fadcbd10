//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Build catalog → Publish → Start listener
//!
//! Shutdown:
//!     Ctrl+C (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → server stops accepting, drains, exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
