//! Public handlers consumed by the login pages.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::preview::{render_login, LoginView};
use crate::session::CookiePolicy;
use crate::site::SiteConfig;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `primary` query parameter of login renders.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub primary: Option<String>,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn get_config(State(state): State<AppState>) -> Result<Json<SiteConfig>, ApiError> {
    state
        .committed_config()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("configuration not found".to_string()))
}

pub async fn get_login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<LoginView>, ApiError> {
    let committed = state
        .committed_config()
        .await
        .ok_or_else(|| ApiError::NotFound("configuration not found".to_string()))?;
    Ok(Json(render_login(None, &committed, query.primary.as_deref())))
}

/// Cookie attributes for the requesting host. Never touches storage.
pub async fn get_cookie_policy(State(state): State<AppState>, headers: HeaderMap) -> Json<CookiePolicy> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    Json(CookiePolicy::resolve(
        state.repository.cache(),
        &state.settings.cookies,
        host,
    ))
}
