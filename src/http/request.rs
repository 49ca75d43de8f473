//! Request IDs.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - An incoming `x-request-id` is kept; otherwise a UUID v4 is generated
//! - The ID is echoed on the response

use axum::http::HeaderName;
use tower::Layer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestId, SetRequestId};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sets and propagates `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = SetRequestId<PropagateRequestId<S>, MakeRequestUuid>;

    fn layer(&self, inner: S) -> Self::Service {
        let header = HeaderName::from_static(REQUEST_ID_HEADER);
        SetRequestId::new(
            PropagateRequestId::new(inner, header.clone()),
            header,
            MakeRequestUuid,
        )
    }
}
