//! Admin console API.
//!
//! Every route requires the caller email header; write routes additionally
//! require the caller to be on the allow-list.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use self::auth::caller_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/session", get(get_session))
        .route("/admin/initialize", post(initialize))
        .route("/admin/reload", post(reload))
        .route("/admin/config/{section}", put(put_section))
        .route("/admin/console/enter", post(enter_console))
        .route("/admin/console/exit", post(exit_console))
        .route("/admin/preview", get(get_preview))
        .route("/admin/preview/login", get(get_preview_login))
        .route("/admin/preview/{section}", patch(patch_preview))
        .route_layer(middleware::from_fn_with_state(state.clone(), caller_middleware))
        .with_state(state)
}
