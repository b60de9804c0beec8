//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → server stops accepting → in-flight requests finish
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
