//! HTTP adapters for the request logger.
//!
//! # Data Flow
//! ```text
//! Framework mode:
//!     axum::serve (connect info)
//!     → server.rs (trace, request id, timeout layers)
//!     → middleware/request_log.rs (context in, status from Response out)
//!     → routes.rs (Router)
//!
//! Raw mode:
//!     net::Listener (bounded accept)
//!     → raw.rs (hyper http1 per connection, body buffered)
//!     → sink.rs (ResponseObserver over BufferedResponse)
//!     → routes.rs (demo_handler writes into the sink)
//! ```

pub mod middleware;
pub mod raw;
pub mod routes;
pub mod server;
pub mod sink;

pub use raw::{LoggedHandler, RawServer, SinkHandler};
pub use server::HttpServer;
pub use sink::{BufferedResponse, ResponseObserver, ResponseSink};
