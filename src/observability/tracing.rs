//! Request spans.
//!
//! Every request gets one span carrying its request ID, so log lines from
//! storage, repository and session code can be correlated per request.

use axum::http::Request;
use tower_http::trace::MakeSpan;
use ::tracing::Span;

use crate::http::request::REQUEST_ID_HEADER;

/// Span factory for `TraceLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        ::tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}
