//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → CLI overrides applied by the binary, then validated again
//! ```
//!
//! # Design Decisions
//! - The middleware itself has no configuration surface; this only wires
//!   the demo server and the access line output
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ColorMode, ListenerConfig, LoggerConfig, ObservabilityConfig, OutputMode, RequestLogConfig,
    ServerConfig, ServerMode,
};
pub use validation::{validate_config, ValidationError};
