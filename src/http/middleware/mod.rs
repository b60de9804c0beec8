//! HTTP middleware

pub mod request_id;
pub mod request_log;

pub use request_id::UuidRequestId;
pub use request_log::request_log_middleware;
