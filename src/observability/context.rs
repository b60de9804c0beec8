//! Per-request metadata captured at request entry.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, Method, Request, Uri};
use chrono::{DateTime, Local};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PORT: &str = "x-forwarded-port";
pub const X_REQUEST_ID: &str = "x-request-id";

/// Everything the access line needs about a request, taken before the inner
/// handler runs. Owned by a single middleware invocation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Wall-clock time at entry, rendered in the timestamp column.
    pub started_at: DateTime<Local>,
    /// Monotonic time at entry, used for the elapsed column.
    pub start: Instant,
    pub method: String,
    /// Request target as sent by the client (path and query).
    pub target: String,
    /// Transport peer address; empty when the host did not provide one.
    pub peer_addr: String,
    pub forwarded_for: Option<String>,
    pub forwarded_port: Option<String>,
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Capture a request at entry.
    pub fn capture<B>(request: &Request<B>, peer: Option<SocketAddr>) -> Self {
        Self::from_parts(request.method(), request.uri(), request.headers(), peer)
    }

    pub fn from_parts(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
    ) -> Self {
        Self {
            started_at: Local::now(),
            start: Instant::now(),
            method: method.as_str().to_string(),
            target: request_target(uri),
            peer_addr: peer.map(|addr| addr.to_string()).unwrap_or_default(),
            forwarded_for: header(headers, X_FORWARDED_FOR),
            forwarded_port: header(headers, X_FORWARDED_PORT),
            request_id: header(headers, X_REQUEST_ID),
        }
    }

    /// Address shown in the access line.
    ///
    /// `X-Forwarded-For` wins over the peer address and is joined with
    /// `X-Forwarded-Port`, even when the port is missing.
    pub fn remote_address(&self) -> String {
        match &self.forwarded_for {
            Some(forwarded) => format!(
                "{}:{}",
                forwarded,
                self.forwarded_port.as_deref().unwrap_or_default()
            ),
            None => self.peer_addr.clone(),
        }
    }

    /// Time since entry.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Origin-form requests keep path and query; absolute-form keeps the full URI.
fn request_target(uri: &Uri) -> String {
    if uri.authority().is_some() {
        return uri.to_string();
    }
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Empty and non-UTF-8 values read as absent.
fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
