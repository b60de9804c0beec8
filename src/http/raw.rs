//! Writer-style adapter on plain hyper connections.
//!
//! # Responsibilities
//! - Drive `SinkHandler`s (handlers that write into a `ResponseSink`)
//! - Wrap each response in a `ResponseObserver` and log one line per request
//! - Accept loop with connection limits and broadcast shutdown
//!
//! # Design Decisions
//! - The request body is buffered before the handler runs
//! - The peer address is known per connection, so each connection gets its
//!   own `ConnectionService`
//! - Request id column shown by default

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{HeaderValue, Request, Response, StatusCode};
use axum::BoxError;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::http::sink::{BufferedResponse, ResponseObserver, ResponseSink};
use crate::net::{Listener, ListenerError};
use crate::observability::context::X_REQUEST_ID;
use crate::observability::{RequestContext, RequestLogger};

/// Largest request body handed to a handler.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A handler that writes its response into a sink.
pub trait SinkHandler: Send + Sync + 'static {
    fn serve(&self, request: &Request<Bytes>, sink: &mut dyn ResponseSink);
}

impl<F> SinkHandler for F
where
    F: Fn(&Request<Bytes>, &mut dyn ResponseSink) + Send + Sync + 'static,
{
    fn serve(&self, request: &Request<Bytes>, sink: &mut dyn ResponseSink) {
        self(request, sink)
    }
}

/// A `SinkHandler` wrapped with request logging.
pub struct LoggedHandler<H> {
    handler: Arc<H>,
    logger: Arc<RequestLogger>,
    generate_request_id: bool,
}

impl<H> Clone for LoggedHandler<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            logger: Arc::clone(&self.logger),
            generate_request_id: self.generate_request_id,
        }
    }
}

impl<H: SinkHandler> LoggedHandler<H> {
    pub fn new(handler: H, logger: RequestLogger) -> Self {
        Self {
            handler: Arc::new(handler),
            logger: Arc::new(logger),
            generate_request_id: false,
        }
    }

    /// Assign a UUID v4 request id when the client sent none.
    pub fn with_generated_request_id(mut self, enabled: bool) -> Self {
        self.generate_request_id = enabled;
        self
    }

    /// Run `next` exactly once with an observed sink, then log.
    ///
    /// Returns the sink so the caller can send what was written.
    pub fn serve_with<S, F>(
        &self,
        request: &Request<Bytes>,
        peer: Option<SocketAddr>,
        sink: S,
        next: F,
    ) -> S
    where
        S: ResponseSink,
        F: FnOnce(&Request<Bytes>, &mut dyn ResponseSink),
    {
        let ctx = RequestContext::capture(request, peer);
        let mut observer = ResponseObserver::new(sink);

        next(request, &mut observer);

        self.logger.log(&ctx, observer.status().as_u16());
        observer.into_inner()
    }

    /// Run the wrapped handler for a buffered request.
    pub fn serve(
        &self,
        request: &Request<Bytes>,
        peer: Option<SocketAddr>,
        sink: &mut dyn ResponseSink,
    ) {
        self.serve_with(request, peer, sink, |request, sink| {
            self.handler.serve(request, sink)
        });
    }

    /// Buffer the body, run the handler, and build the response.
    ///
    /// Bodies over 1 MiB skip the handler and are answered and logged as 400.
    pub async fn handle<B>(&self, request: Request<B>, peer: SocketAddr) -> Response<Body>
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (mut parts, body) = request.into_parts();
        let mut response = BufferedResponse::new();

        if self.generate_request_id && !parts.headers.contains_key(X_REQUEST_ID) {
            if let Ok(id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                parts.headers.insert(X_REQUEST_ID, id.clone());
                response.headers_mut().insert(X_REQUEST_ID, id);
            }
        }

        match axum::body::to_bytes(Body::new(body), MAX_BODY_BYTES).await {
            Ok(bytes) => {
                let request = Request::from_parts(parts, bytes);
                self.serve(&request, Some(peer), &mut response);
            }
            Err(e) => {
                tracing::warn!(peer_addr = %peer, error = %e, "Failed to read request body");
                let request = Request::from_parts(parts, Bytes::new());
                self.serve_with(&request, Some(peer), &mut response, |_, sink| {
                    sink.write_status(StatusCode::BAD_REQUEST);
                    sink.write_text("invalid request body\n");
                });
            }
        }

        response.into_response()
    }
}

/// Per-connection hyper service.
pub struct ConnectionService<H> {
    handler: LoggedHandler<H>,
    peer: SocketAddr,
}

impl<H: SinkHandler> ConnectionService<H> {
    pub fn new(handler: LoggedHandler<H>, peer: SocketAddr) -> Self {
        Self { handler, peer }
    }
}

impl<H: SinkHandler> hyper::service::Service<Request<Incoming>> for ConnectionService<H> {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<Incoming>) -> Self::Future {
        let handler = self.handler.clone();
        let peer = self.peer;
        Box::pin(async move { Ok(handler.handle(request, peer).await) })
    }
}

/// HTTP/1.1 server that runs a `LoggedHandler` on every connection.
pub struct RawServer<H> {
    handler: LoggedHandler<H>,
}

impl<H: SinkHandler> RawServer<H> {
    pub fn new(handler: LoggedHandler<H>) -> Self {
        Self { handler }
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Connections already in flight are left to finish on their own tasks.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(address = %addr, "Raw HTTP server starting");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let service = ConnectionService::new(self.handler.clone(), peer);
                        tokio::spawn(async move {
                            let _permit = permit;
                            if let Err(e) = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await
                            {
                                tracing::debug!(peer_addr = %peer, error = %e, "Connection error");
                            }
                        });
                    }
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                    Err(e) => return Err(e),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Raw HTTP server stopped");
        Ok(())
    }
}
