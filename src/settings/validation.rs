//! Settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceSettings → Result<(), Vec<ValidationError>>
//! - Runs after environment overrides are applied

use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::settings::schema::{ServiceSettings, StorageBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted settings path (e.g. `storage.url`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_settings(settings: &ServiceSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", settings.listener.bind_address),
        ));
    }
    if settings.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    let storage = &settings.storage;
    if storage.backend == StorageBackend::Supabase {
        if storage.url.is_empty() {
            errors.push(ValidationError::new("storage.url", "is required (or set SUPABASE_URL)"));
        } else if Url::parse(&storage.url).is_err() {
            errors.push(ValidationError::new(
                "storage.url",
                format!("'{}' is not an absolute URL", storage.url),
            ));
        }
        if storage.api_key.is_empty() {
            errors.push(ValidationError::new(
                "storage.api_key",
                "is required (or set SUPABASE_ANON_KEY)",
            ));
        }
    }
    if storage.bucket.trim().is_empty() {
        errors.push(ValidationError::new("storage.bucket", "must not be empty"));
    }
    if storage.object_key.trim().is_empty() {
        errors.push(ValidationError::new("storage.object_key", "must not be empty"));
    }
    if storage.request_timeout_secs == 0 {
        errors.push(ValidationError::new("storage.request_timeout_secs", "must be > 0"));
    }

    if settings.admin.user_header.trim().is_empty() {
        errors.push(ValidationError::new("admin.user_header", "must not be empty"));
    }

    let observability = &settings.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
