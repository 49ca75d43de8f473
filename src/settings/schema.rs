//! Service settings schema.
//!
//! Settings for running the service itself (listener, storage credentials,
//! admin allow-list, logging). The site configuration document lives in
//! object storage and is described in [`crate::site`].

use serde::{Deserialize, Serialize};

use crate::repository::{CONFIG_BUCKET, CONFIG_FILE};

/// Root service settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub listener: ListenerSettings,

    /// Where the configuration document is stored.
    pub storage: StorageSettings,

    pub admin: AdminSettings,

    /// Session cookie attributes not carried by the document.
    pub cookies: CookieSettings,

    pub observability: ObservabilityConfig,
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed per request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Object storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Supabase Storage REST API.
    #[default]
    Supabase,
    /// Process-local store; contents vanish on restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,

    /// Supabase project URL (e.g., "https://xyz.supabase.co").
    pub url: String,

    /// Anon or service key sent as `apikey` and bearer token.
    pub api_key: String,

    pub bucket: String,

    pub object_key: String,

    /// Timeout for each storage request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Supabase,
            url: String::new(),
            api_key: String::new(),
            bucket: CONFIG_BUCKET.to_string(),
            object_key: CONFIG_FILE.to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Admin console access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Emails allowed to edit. Merged with `ADMIN_EMAILS`.
    pub admin_emails: Vec<String>,

    /// Header carrying the signed-in user's email.
    pub user_header: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            user_header: "x-user-email".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Fallback cookie domain when the document sets none.
    pub domain: Option<String>,

    /// Add the `Secure` attribute.
    pub secure: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
