//! Fetch, parse, serialize and persist the configuration document.

use std::sync::Arc;
use thiserror::Error;

use crate::observability::metrics;
use crate::repository::cache::ConfigCache;
use crate::site::{default_config, SiteConfig};
use crate::storage::{ObjectStore, StorageError, UploadOptions};

/// Bucket holding the site configuration.
pub const CONFIG_BUCKET: &str = "auth-site";

/// Object key of the configuration document.
pub const CONFIG_FILE: &str = "config.json";

/// Errors surfaced by repository writes.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The storage write failed; carries the backend message.
    #[error("Failed to upload config: {message}")]
    Upload { message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<StorageError> for ConfigError {
    fn from(err: StorageError) -> Self {
        ConfigError::Upload {
            message: err.message(),
        }
    }
}

/// Result type for repository writes.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detailed result of a load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(SiteConfig),
    /// No document under the key.
    Missing,
    /// The object exists but holds only whitespace.
    Empty,
    /// The object holds something that is not a configuration document.
    Malformed(String),
    /// Neither read path produced an answer.
    Unreachable(String),
}

impl LoadOutcome {
    pub fn into_config(self) -> Option<SiteConfig> {
        match self {
            LoadOutcome::Loaded(config) => Some(config),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded(_) => "loaded",
            LoadOutcome::Missing => "missing",
            LoadOutcome::Empty => "empty",
            LoadOutcome::Malformed(_) => "malformed",
            LoadOutcome::Unreachable(_) => "unreachable",
        }
    }
}

/// Reads and writes the configuration document in object storage.
pub struct ConfigRepository {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    cache: Arc<ConfigCache>,
    key: String,
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn ObjectStore>, cache: Arc<ConfigCache>) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
            cache,
            key: CONFIG_FILE.to_string(),
        }
    }

    /// Use a different object key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Client used for the public URL fallback.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn cache(&self) -> &Arc<ConfigCache> {
        &self.cache
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the document is present in the bucket listing.
    ///
    /// Storage errors count as absent.
    pub async fn exists(&self) -> bool {
        match self.store.list(&self.key).await {
            Ok(objects) => objects.iter().any(|o| o.name == self.key),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Error checking config existence");
                false
            }
        }
    }

    /// Load the document, collapsing every failure to `None`.
    pub async fn load(&self) -> Option<SiteConfig> {
        self.load_detailed().await.into_config()
    }

    /// Load the document, keeping the reason for a failure.
    pub async fn load_detailed(&self) -> LoadOutcome {
        tracing::debug!(key = %self.key, "Fetching config from storage");

        let outcome = match self.store.download(&self.key).await {
            Ok(bytes) => parse(&bytes),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "Failed to fetch config (download), trying public URL");
                self.load_public(err).await
            }
        };

        match &outcome {
            LoadOutcome::Loaded(config) => {
                tracing::info!(revision = config.revision, "Config loaded");
                self.cache.set(config.clone());
            }
            LoadOutcome::Malformed(reason) => {
                tracing::error!(key = %self.key, reason = %reason, "Error parsing config from storage");
            }
            LoadOutcome::Empty => tracing::warn!(key = %self.key, "Empty config text from storage"),
            LoadOutcome::Missing => tracing::info!(key = %self.key, "No config in storage"),
            LoadOutcome::Unreachable(reason) => {
                tracing::warn!(key = %self.key, reason = %reason, "Config storage unreachable");
            }
        }
        metrics::record_config_load(outcome.label());
        outcome
    }

    async fn load_public(&self, download_err: StorageError) -> LoadOutcome {
        let Some(url) = self.store.public_url(&self.key) else {
            return if download_err.is_not_found() {
                LoadOutcome::Missing
            } else {
                LoadOutcome::Unreachable(download_err.to_string())
            };
        };
        metrics::record_public_fallback();

        tracing::debug!(url = %url, "Fetching config from public URL");
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => return LoadOutcome::Unreachable(format!("{}; public URL: {}", download_err, e)),
        };

        let status = response.status();
        if !status.is_success() {
            let gone = status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::BAD_REQUEST;
            return if gone && download_err.is_not_found() {
                LoadOutcome::Missing
            } else {
                LoadOutcome::Unreachable(format!("{}; public URL returned {}", download_err, status))
            };
        }

        match response.bytes().await {
            Ok(bytes) => parse(&bytes),
            Err(e) => LoadOutcome::Unreachable(format!("{}; public URL body: {}", download_err, e)),
        }
    }

    /// Write the default document. Last writer wins.
    pub async fn initialize(&self) -> ConfigResult<SiteConfig> {
        let config = default_config();
        tracing::info!(key = %self.key, "Initializing config from defaults");
        self.save(&config).await?;
        Ok(config)
    }

    /// Overwrite the stored document with `config`.
    pub async fn save(&self, config: &SiteConfig) -> ConfigResult<()> {
        let body = serialize(config)?;
        match self
            .store
            .upload(&self.key, body, UploadOptions::json_upsert())
            .await
        {
            Ok(()) => {
                tracing::info!(revision = config.revision, "Config saved");
                metrics::record_config_save("ok");
                self.cache.set(config.clone());
                Ok(())
            }
            Err(e) => {
                tracing::error!(revision = config.revision, error = %e, "Failed to upload config");
                metrics::record_config_save("error");
                Err(e.into())
            }
        }
    }
}

/// Pretty JSON with two-space indentation.
pub fn serialize(config: &SiteConfig) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(config)
}

fn parse(bytes: &[u8]) -> LoadOutcome {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        return LoadOutcome::Empty;
    }
    match serde_json::from_str::<SiteConfig>(&text) {
        Ok(config) => LoadOutcome::Loaded(config),
        Err(e) => LoadOutcome::Malformed(e.to_string()),
    }
}
