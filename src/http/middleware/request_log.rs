//! Request logging middleware for axum routers.
//!
//! Install with `axum::middleware::from_fn_with_state(logger, request_log_middleware)`.
//! The peer address comes from `ConnectInfo<SocketAddr>` when the router is
//! served with `into_make_service_with_connect_info`; without it the address
//! column is empty unless `X-Forwarded-For` is set.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::{RequestContext, RequestLogger};

/// Log one line per request once the inner service has produced its response.
pub async fn request_log_middleware(
    State(logger): State<Arc<RequestLogger>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ctx = RequestContext::capture(&request, peer);

    let response = next.run(request).await;

    logger.log(&ctx, response.status().as_u16());
    response
}
