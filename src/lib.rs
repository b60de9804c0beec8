//! HTTP request logging middleware.
//!
//! Wraps an inner handler, captures the response status and latency, and
//! writes one fixed-width line per request:
//!
//! ```text
//! 07/03/2024 - 09:05:01.000000042  |  |  200  |         9.42µs | 10.0.0.5:443             |    | GET | /health
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::LoggerConfig;
pub use http::{HttpServer, RawServer};
pub use lifecycle::Shutdown;
pub use observability::RequestLogger;
