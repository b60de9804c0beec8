//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are returned, not
//! just the first.

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::LoggerConfig;

/// A semantic problem with a parsed config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_filter `{0}` is not a valid filter")]
    LogFilter(String),
}

/// Check a config. Pure function of its input.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let filter = config.observability.log_filter.trim();
    if filter.is_empty() || EnvFilter::try_new(filter).is_err() {
        errors.push(ValidationError::LogFilter(
            config.observability.log_filter.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
