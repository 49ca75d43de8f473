//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_site_config_loads_total` (counter): load attempts by `outcome`
//! - `auth_site_config_saves_total` (counter): document writes by `result`
//! - `auth_site_public_url_fallbacks_total` (counter): downloads retried via public URL
//! - `auth_site_preview_updates_total` (counter): effective preview merges by `section`
//! - `auth_site_http_requests_total` (counter): requests by `method`, `status`
//! - `auth_site_http_request_duration_seconds` (histogram): request latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so library code never checks
//! - The Prometheus exporter is opt-in via settings

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_config_load(outcome: &'static str) {
    ::metrics::counter!("auth_site_config_loads_total", "outcome" => outcome).increment(1);
}

pub fn record_config_save(result: &'static str) {
    ::metrics::counter!("auth_site_config_saves_total", "result" => result).increment(1);
}

pub fn record_public_fallback() {
    ::metrics::counter!("auth_site_public_url_fallbacks_total").increment(1);
}

pub fn record_preview_update(section: &'static str) {
    ::metrics::counter!("auth_site_preview_updates_total", "section" => section).increment(1);
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("auth_site_http_requests_total", &labels).increment(1);
    ::metrics::histogram!("auth_site_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Axum middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
