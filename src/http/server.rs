//! Framework-mode HTTP server.
//!
//! # Responsibilities
//! - Wrap an Axum Router with the request logging middleware
//! - Optionally assign and propagate request IDs
//! - Serve with connect info and graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::LoggerConfig;
use crate::http::middleware::{request_log_middleware, UuidRequestId};
use crate::observability::RequestLogger;

/// HTTP server that logs every request passing through its router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build a server around `routes`, logging through `logger`.
    pub fn new(config: &LoggerConfig, routes: Router, logger: RequestLogger) -> Self {
        let router = Self::build_router(config, routes, Arc::new(logger));
        Self { router }
    }

    /// Layer order, outermost first: trace, request id, logging, timeout.
    #[allow(deprecated)]
    fn build_router(config: &LoggerConfig, routes: Router, logger: Arc<RequestLogger>) -> Router {
        let router = routes
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(from_fn_with_state(logger, request_log_middleware));

        let router = if config.request_log.generate_request_id {
            router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
        } else {
            router
        };

        router.layer(TraceLayer::new_for_http())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes;
    use crate::observability::{LineOptions, MemorySink, RequestLogFormatter};
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn server(config: &LoggerConfig) -> (HttpServer, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = RequestLogger::new(
            RequestLogFormatter::plain(LineOptions::default()),
            sink.clone(),
        );
        (HttpServer::new(config, routes::router(), logger), sink)
    }

    #[tokio::test]
    async fn generated_request_id_reaches_the_log_and_response() {
        let mut config = LoggerConfig::default();
        config.request_log.generate_request_id = true;
        let (server, sink) = server(&config);

        let response = server
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()["x-request-id"].to_str().unwrap().to_string();
        assert_eq!(sink.lines()[0].split(" | ").nth(1), Some(id.as_str()));
    }

    #[tokio::test]
    async fn client_request_id_is_kept() {
        let mut config = LoggerConfig::default();
        config.request_log.generate_request_id = true;
        let (server, sink) = server(&config);

        server
            .router()
            .oneshot(
                Request::get("/")
                    .header("X-Request-Id", "client-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(sink.lines()[0].split(" | ").nth(1), Some("client-id"));
    }

    #[tokio::test]
    async fn request_id_column_empty_without_generation() {
        let (server, sink) = server(&LoggerConfig::default());

        server
            .router()
            .oneshot(Request::get("/status/304").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let line = &sink.lines()[0];
        assert_eq!(line.split(" | ").nth(1), Some(""));
        assert!(line.contains(" |  304  | "));
    }
}
