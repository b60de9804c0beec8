//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for the request logger demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Which adapter serves requests.
    pub server: ServerConfig,

    /// Access line settings.
    pub request_log: RequestLogConfig,

    /// Diagnostic logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure, raw mode).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Host adapter the middleware is installed in.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Axum router with the middleware layered in.
    #[default]
    Framework,
    /// Plain hyper connections driving writer-style handlers.
    Raw,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub mode: ServerMode,

    /// Request timeout in seconds (framework mode).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: ServerMode::Framework,
            request_timeout_secs: 30,
        }
    }
}

/// When access lines carry ANSI colors.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Where access lines go.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Straight to stdout.
    #[default]
    Stdout,
    /// As `info` events on the `request_log` tracing target.
    Tracing,
}

/// Access line configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct RequestLogConfig {
    pub color: ColorMode,

    pub output: OutputMode,

    /// Show the `X-Request-Id` column. Unset means the adapter's default
    /// (shown in raw mode, hidden in framework mode).
    pub include_request_id: Option<bool>,

    /// Assign a UUID v4 `X-Request-Id` to requests that arrive without one.
    pub generate_request_id: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "request_logger=info,request_log=info,tower_http=info".to_string(),
        }
    }
}
