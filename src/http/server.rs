//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with public and admin handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Hold per-caller admin sessions and preview stores
//! - Serve until the shutdown signal fires

use axum::{middleware, routing::get, Router};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::auth::Caller;
use crate::admin::setup_admin_router;
use crate::http::handlers::{get_config, get_cookie_policy, get_login, health};
use crate::http::request::RequestIdLayer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::observability::tracing::RequestSpan;
use crate::preview::PreviewStore;
use crate::repository::ConfigRepository;
use crate::session::{AdminAllowList, AdminSession};
use crate::settings::ServiceSettings;
use crate::site::SiteConfig;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ConfigRepository>,
    pub allow_list: Arc<AdminAllowList>,
    pub settings: Arc<ServiceSettings>,
    /// Admin sessions keyed by lowercase caller email.
    pub sessions: Arc<DashMap<String, Arc<AdminSession>>>,
    /// Preview stores of callers currently inside the console.
    pub previews: Arc<DashMap<String, PreviewStore>>,
}

impl AppState {
    pub fn new(repository: Arc<ConfigRepository>, allow_list: AdminAllowList, settings: ServiceSettings) -> Self {
        Self {
            repository,
            allow_list: Arc::new(allow_list),
            settings: Arc::new(settings),
            sessions: Arc::new(DashMap::new()),
            previews: Arc::new(DashMap::new()),
        }
    }

    /// Session for `caller`.
    ///
    /// Admin sessions are kept until the caller exits the console; read-only
    /// sessions are built per request and never retained.
    pub async fn session_for(&self, caller: &Caller) -> Arc<AdminSession> {
        if !caller.is_admin {
            return Arc::new(AdminSession::start(self.repository.clone(), false).await);
        }

        let key = caller.email.to_lowercase();
        if let Some(session) = self.sessions.get(&key) {
            return session.clone();
        }

        let session = Arc::new(AdminSession::start(self.repository.clone(), true).await);
        tracing::info!(email = %key, "Admin session started");
        // A concurrent first request may have won; keep whichever landed first.
        self.sessions.entry(key).or_insert(session).clone()
    }

    /// Drop the retained session and preview of `email`.
    pub fn end_session(&self, email: &str) -> bool {
        let key = email.to_lowercase();
        let session = self.sessions.remove(&key).is_some();
        let preview = self.previews.remove(&key).is_some();
        session || preview
    }

    pub fn preview_for(&self, email: &str) -> Option<PreviewStore> {
        self.previews.get(&email.to_lowercase()).map(|p| p.clone())
    }

    /// Committed document: cache first, then storage.
    pub async fn committed_config(&self) -> Option<SiteConfig> {
        match self.repository.cache().get() {
            Some(config) => Some((*config).clone()),
            None => self.repository.load().await,
        }
    }
}

/// HTTP server for the auth site.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeout = Duration::from_secs(state.settings.listener.request_timeout_secs);

        Router::new()
            .route("/health", get(health))
            .route("/config", get(get_config))
            .route("/login", get(get_login))
            .route("/session/cookie-policy", get(get_cookie_policy))
            .with_state(state.clone())
            .merge(setup_admin_router(state))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
            .layer(RequestIdLayer)
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::startup;
    use crate::storage::MemoryStore;

    fn state() -> AppState {
        let mut settings = ServiceSettings::default();
        settings.admin.admin_emails = vec!["admin@example.com".into()];
        startup::build_state(settings, Arc::new(MemoryStore::new())).unwrap()
    }

    fn caller(state: &AppState, email: &str) -> Caller {
        Caller {
            email: email.to_string(),
            is_admin: state.allow_list.is_admin(Some(email)),
        }
    }

    #[tokio::test]
    async fn test_read_only_sessions_are_not_retained() {
        let state = state();
        for i in 0..50 {
            let visitor = caller(&state, &format!("visitor{}@example.com", i));
            assert!(!state.session_for(&visitor).await.is_admin());
        }
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_admin_session_lives_until_console_exit() {
        let state = state();
        let admin = caller(&state, "Admin@Example.com");

        let first = state.session_for(&admin).await;
        let again = state.session_for(&admin).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(state.sessions.len(), 1);

        state
            .previews
            .insert("admin@example.com".into(), PreviewStore::seeded(SiteConfig::default()));
        assert!(state.end_session(&admin.email));
        assert!(state.sessions.is_empty());
        assert!(state.preview_for(&admin.email).is_none());
        assert!(!state.end_session(&admin.email));
    }
}
