//! Diagnostic logging setup.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Let `RUST_LOG` override the configured filter
//!
//! # Design Decisions
//! - Access lines do not go through here unless `output = "tracing"`
//! - Human-readable `fmt` output only

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
