//! Caller identification for admin routes.
//!
//! The upstream auth front-end forwards the signed-in user's email in a
//! header (`x-user-email` by default). A request without it is rejected;
//! with it, the caller is tagged admin or not from the allow-list.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// The identified caller, inserted as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub email: String,
    pub is_admin: bool,
}

pub async fn caller_middleware(State(state): State<AppState>, mut request: Request<Body>, next: Next) -> Response {
    let header = state.settings.admin.user_header.as_str();
    let email = request
        .headers()
        .get(header)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    let Some(email) = email else {
        return ApiError::Unauthorized(header.to_string()).into_response();
    };

    let is_admin = state.allow_list.is_admin(Some(&email));
    tracing::debug!(email = %email, is_admin, "Caller identified");
    request.extensions_mut().insert(Caller { email, is_admin });
    next.run(request).await
}
