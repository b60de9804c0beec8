//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request entry
//!     → context.rs (RequestContext: time, method, target, addresses, id)
//! inner handler returns
//!     → logger.rs (RequestLogger::log with final status)
//!     → format.rs (fixed-width columns, painted via paint.rs)
//!     → output.rs (stdout, tracing event, or memory)
//!
//! Diagnostics:
//!     → logging.rs (tracing subscriber for server events)
//! ```
//!
//! # Design Decisions
//! - One line per request, written in a single call
//! - Formatting never fails; unknown values render uncolored
//! - Access lines and diagnostics are separate streams

pub mod context;
pub mod format;
pub mod logger;
pub mod logging;
pub mod output;
pub mod paint;

pub use context::RequestContext;
pub use format::{LineOptions, RequestLogFormatter};
pub use logger::RequestLogger;
pub use output::{LogSink, MemorySink, StdoutSink, TracingSink};
pub use paint::{AnsiPainter, Paint, Painter, PlainPainter};
