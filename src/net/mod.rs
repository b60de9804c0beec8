//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → Hand off to http::raw (one hyper connection per stream)
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion
//! - Framework mode uses axum's own accept loop and skips this layer

pub mod listener;

pub use listener::{ConnectionPermit, Listener, ListenerError};
