//! Demo routes served by the binary, for both adapters.
//!
//! - `/` plain text banner
//! - `/health` JSON status
//! - `/status/{code}` responds with the given status (200..=599, else 400)
//! - `/echo` returns the request body
//! - anything else is 404

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderValue, Request, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;

use crate::http::sink::ResponseSink;

const BANNER: &str = "request-logger\n";

/// Axum router for framework mode. Middleware is layered on by the server.
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/health", get(health))
        .route("/status/{code}", any(status))
        .route("/echo", any(|body: Bytes| async move { body }))
        .fallback(|| async { (StatusCode::NOT_FOUND, "not found\n") })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    match final_status(code) {
        Some(status) => status.into_response(),
        None => (StatusCode::BAD_REQUEST, "invalid status code\n").into_response(),
    }
}

/// Codes hyper will send as a final response. 1xx are interim only.
fn final_status(code: u16) -> Option<StatusCode> {
    if (200..=599).contains(&code) {
        StatusCode::from_u16(code).ok()
    } else {
        None
    }
}

/// Writer-style equivalent of [`router`] for raw mode.
pub fn demo_handler(request: &Request<Bytes>, sink: &mut dyn ResponseSink) {
    let path = request.uri().path();

    match path {
        "/" => sink.write_text(BANNER),
        "/health" => {
            sink.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            sink.write_text(&json!({ "status": "ok" }).to_string());
        }
        "/echo" => sink.write_body(request.body()),
        _ => match path.strip_prefix("/status/") {
            Some(code) => match code.parse::<u16>().ok().and_then(final_status) {
                Some(status) => sink.write_status(status),
                None => {
                    sink.write_status(StatusCode::BAD_REQUEST);
                    sink.write_text("invalid status code\n");
                }
            },
            None => {
                sink.write_status(StatusCode::NOT_FOUND);
                sink.write_text("not found\n");
            }
        },
    }
}
