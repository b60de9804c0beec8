//! Writer-style response sinks and the status-capturing observer.
//!
//! # Responsibilities
//! - `ResponseSink`: the capability a writer-style handler writes through
//! - `ResponseObserver`: forwards everything, remembers the status
//! - `BufferedResponse`: collects a written response into `Response<Body>`
//!
//! # Design Decisions
//! - HTTP semantics: the first explicit status wins, and writing the body
//!   first commits 200 OK
//! - The observer applies the same rule, so the status it reports is the one
//!   the client receives

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Response, StatusCode};

/// Something an HTTP response can be written to.
pub trait ResponseSink {
    /// Response headers; changes after the body has started are not sent.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status.
    fn write_status(&mut self, status: StatusCode);

    /// Append body bytes.
    fn write_body(&mut self, chunk: &[u8]);

    fn write_text(&mut self, text: &str) {
        self.write_body(text.as_bytes());
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status)
    }

    fn write_body(&mut self, chunk: &[u8]) {
        (**self).write_body(chunk)
    }
}

/// Transparent sink decorator that records the status written through it.
#[derive(Debug)]
pub struct ResponseObserver<S> {
    inner: S,
    status: StatusCode,
    committed: bool,
}

impl<S: ResponseSink> ResponseObserver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            status: StatusCode::OK,
            committed: false,
        }
    }

    /// Status the response carries: the first explicit one, or 200.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ResponseSink> ResponseSink for ResponseObserver<S> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        if !self.committed {
            self.status = status;
            self.committed = true;
        }
        self.inner.write_status(status);
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.committed = true;
        self.inner.write_body(chunk);
    }
}

/// In-memory response that a writer-style handler fills in.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status that will be sent.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(Bytes::from(self.body)));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(current) => {
                tracing::debug!(%current, ignored = %status, "Superfluous status write");
            }
        }
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }
}
