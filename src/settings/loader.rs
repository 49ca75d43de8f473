//! Settings loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::settings::schema::ServiceSettings;
use crate::settings::validation::{validate_settings, ValidationError};

/// Environment variables that override file settings.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_ADMIN_EMAILS: &str = "ADMIN_EMAILS";
pub const ENV_BIND: &str = "AUTH_SITE_BIND";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load settings from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load_settings(path: Option<&Path>) -> Result<ServiceSettings, SettingsError> {
    let mut settings = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceSettings::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    validate_settings(&settings).map_err(SettingsError::Validation)?;

    Ok(settings)
}

/// Apply overrides from `lookup`. Empty values are ignored; admin emails
/// from the environment are appended to the file's list.
pub fn apply_env_overrides<F>(settings: &mut ServiceSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_SUPABASE_URL) {
        settings.storage.url = url;
    }
    if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
        settings.storage.api_key = key;
    }
    if let Some(bind) = get(ENV_BIND) {
        settings.listener.bind_address = bind;
    }
    if let Some(emails) = get(ENV_ADMIN_EMAILS) {
        settings
            .admin
            .admin_emails
            .extend(emails.split(',').map(|e| e.trim().to_string()).filter(|e| !e.is_empty()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SUPABASE_URL, "https://abc.supabase.co"),
            (ENV_SUPABASE_ANON_KEY, "anon-key"),
            (ENV_ADMIN_EMAILS, "a@x.io, b@x.io"),
            (ENV_BIND, ""),
        ]
        .into_iter()
        .collect();

        let mut settings = ServiceSettings::default();
        settings.admin.admin_emails = vec!["file@x.io".into()];
        apply_env_overrides(&mut settings, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.storage.url, "https://abc.supabase.co");
        assert_eq!(settings.storage.api_key, "anon-key");
        assert_eq!(settings.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(settings.admin.admin_emails, vec!["file@x.io", "a@x.io", "b@x.io"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Some(Path::new("/nonexistent/auth-site.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let path = std::env::temp_dir().join(format!("auth-site-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[listener\nbind_address = 1").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = SettingsError::Validation(vec![
            ValidationError {
                field: "storage.url",
                message: "is required".into(),
            },
            ValidationError {
                field: "storage.api_key",
                message: "is required".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: storage.url: is required, storage.api_key: is required"
        );
    }
}
