//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use request_logger::config::LoggerConfig;
use request_logger::http::{routes, HttpServer, LoggedHandler, RawServer};
use request_logger::lifecycle::Shutdown;
use request_logger::net::Listener;
use request_logger::observability::{LineOptions, MemorySink, RequestLogFormatter, RequestLogger};

/// A server running on an ephemeral port, logging into memory.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub lines: Arc<MemorySink>,
    pub shutdown: Shutdown,
    pub task: JoinHandle<()>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait until at least `count` lines were logged.
    pub async fn wait_for_lines(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let lines = self.lines.lines();
            if lines.len() >= count {
                return lines;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.lines.lines()
    }
}

fn memory_logger(options: LineOptions) -> (RequestLogger, Arc<MemorySink>) {
    let lines = Arc::new(MemorySink::new());
    let logger = RequestLogger::new(RequestLogFormatter::plain(options), lines.clone());
    (logger, lines)
}

/// Start the axum adapter with the demo routes.
pub async fn start_framework_server(config: LoggerConfig, options: LineOptions) -> RunningServer {
    let (logger, lines) = memory_logger(options);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, routes::router(), logger);
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningServer {
        addr,
        lines,
        shutdown,
        task,
    }
}

/// Start the writer-style adapter with the demo handler.
pub async fn start_raw_server(options: LineOptions) -> RunningServer {
    let (logger, lines) = memory_logger(options);
    let mut config = LoggerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = RawServer::new(LoggedHandler::new(routes::demo_handler, logger));
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningServer {
        addr,
        lines,
        shutdown,
        task,
    }
}

/// Split an access line into its columns.
pub fn columns(line: &str) -> Vec<String> {
    line.trim_end_matches('\n')
        .split(" | ")
        .map(str::to_string)
        .collect()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
