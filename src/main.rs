//! Request logger demo server.
//!
//! Serves a handful of demo routes through one of the two adapters and
//! writes an access line per request.
//!
//! ```text
//! request-logger --config logger.toml --mode raw --color never
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_logger::config::{
    load_config, validate_config, ColorMode, ConfigError, LoggerConfig, ServerMode,
};
use request_logger::http::{routes, HttpServer, LoggedHandler, RawServer};
use request_logger::lifecycle::{signals, Shutdown};
use request_logger::net::Listener;
use request_logger::observability::{logging, RequestLogger};

#[derive(Parser)]
#[command(name = "request-logger")]
#[command(about = "HTTP server that logs one line per request", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Adapter, overrides `server.mode`.
    #[arg(short, long, value_enum)]
    mode: Option<ServerMode>,

    /// Access line colors, overrides `request_log.color`.
    #[arg(long, value_enum)]
    color: Option<ColorMode>,
}

impl Cli {
    fn load(&self) -> Result<LoggerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LoggerConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(mode) = self.mode {
            config.server.mode = mode;
        }
        if let Some(color) = self.color {
            config.request_log.color = color;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init_tracing(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.server.mode,
        color = ?config.request_log.color,
        output = ?config.request_log.output,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    match config.server.mode {
        ServerMode::Framework => {
            let logger = RequestLogger::from_config(&config.request_log, false);
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            let server = HttpServer::new(&config, routes::router(), logger);
            server.run(listener, shutdown.subscribe()).await?;
        }
        ServerMode::Raw => {
            let logger = RequestLogger::from_config(&config.request_log, true);
            let handler = LoggedHandler::new(routes::demo_handler, logger)
                .with_generated_request_id(config.request_log.generate_request_id);
            let listener = Listener::bind(&config.listener).await?;
            RawServer::new(handler).run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
