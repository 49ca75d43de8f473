//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Storage and repository first, then app state; listeners start last
//! - The configuration document is warmed into the cache at startup but a
//!   missing or unreachable document is not fatal

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::http::AppState;
use crate::repository::{ConfigCache, ConfigRepository};
use crate::session::AdminAllowList;
use crate::settings::{ServiceSettings, StorageBackend};
use crate::storage::{MemoryStore, ObjectStore, StorageError, SupabaseStorage};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build storage client: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the object store selected in settings.
pub fn build_store(settings: &ServiceSettings) -> Result<Arc<dyn ObjectStore>, StartupError> {
    let storage = &settings.storage;
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::Supabase => Arc::new(SupabaseStorage::new(
            &storage.url,
            &storage.api_key,
            &storage.bucket,
            Duration::from_secs(storage.request_timeout_secs),
        )?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; configuration is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

/// Build the shared application state over `store`.
///
/// The public URL fallback gets the same request timeout as the storage
/// client.
pub fn build_state(settings: ServiceSettings, store: Arc<dyn ObjectStore>) -> Result<AppState, StartupError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.storage.request_timeout_secs))
        .build()?;
    let repository = ConfigRepository::new(store, Arc::new(ConfigCache::new()))
        .with_key(settings.storage.object_key.clone())
        .with_http_client(http);
    let allow_list = AdminAllowList::from_emails(&settings.admin.admin_emails);

    tracing::info!(
        backend = ?settings.storage.backend,
        bucket = %settings.storage.bucket,
        key = %settings.storage.object_key,
        admins = allow_list.len(),
        "Application state initialized"
    );
    if allow_list.is_empty() {
        tracing::warn!("No admin emails configured; the console is read-only for everyone");
    }

    Ok(AppState::new(Arc::new(repository), allow_list, settings))
}

/// Build state from settings and warm the config cache.
pub async fn start(settings: ServiceSettings) -> Result<AppState, StartupError> {
    let store = build_store(&settings)?;
    let state = build_state(settings, store)?;

    let outcome = state.repository.load_detailed().await;
    tracing::info!(outcome = outcome.label(), "Initial config load");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LoadOutcome;
    use crate::settings::StorageSettings;

    fn memory_settings() -> ServiceSettings {
        let mut settings = ServiceSettings {
            storage: StorageSettings {
                backend: StorageBackend::Memory,
                ..Default::default()
            },
            ..Default::default()
        };
        settings.admin.admin_emails = vec!["Admin@Example.com".into()];
        settings
    }

    #[tokio::test]
    async fn test_start_with_memory_backend() {
        let state = start(memory_settings()).await.unwrap();
        assert!(state.allow_list.is_admin(Some("admin@example.com")));
        assert!(state.repository.cache().is_empty());
        assert!(!state.repository.exists().await);
    }

    #[tokio::test]
    async fn test_public_fallback_times_out() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let store = Arc::new(
            MemoryStore::new().with_public_base(format!("http://{}/public/", addr).parse().unwrap()),
        );
        store.fail_download(true);
        let mut settings = memory_settings();
        settings.storage.request_timeout_secs = 1;
        let state = build_state(settings, store).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(10), state.repository.load_detailed())
            .await
            .expect("fallback GET should time out");
        assert!(matches!(outcome, LoadOutcome::Unreachable(_)));
    }

    #[test]
    fn test_supabase_store_rejects_bad_url() {
        let mut settings = ServiceSettings::default();
        settings.storage.url = "not a url".into();
        settings.storage.api_key = "anon".into();
        assert!(build_store(&settings).is_err());
    }
}
