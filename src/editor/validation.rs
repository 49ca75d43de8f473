//! Field validation for section editors.
//!
//! Validators collect every failure rather than stopping at the first one.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// A single field failure. `field` is the camelCase path (`theme.brandColor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field failures of one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message recorded for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Push an error when `value` is blank.
pub fn required(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

static HEX_COLOR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").ok());

/// `#RRGGBB`, either case.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.as_ref().is_some_and(|re| re.is_match(value))
}

pub fn hex_color(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if !is_hex_color(value) {
        errors.push(FieldError::new(field, "must be a hex color like #10B981"));
    }
}

/// Absent or empty passes; anything else must parse as an absolute URL.
pub fn optional_url(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>) {
    match value.map(str::trim) {
        None | Some("") => {}
        Some(value) => {
            if Url::parse(value).is_err() {
                errors.push(FieldError::new(field, "must be an absolute URL"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#10B981"));
        assert!(is_hex_color("#abcdef"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color("#10B98"));
        assert!(!is_hex_color("#10B981FF"));
        assert!(!is_hex_color("10B981"));
    }

    #[test]
    fn test_required_and_urls() {
        let mut errors = Vec::new();
        required(&mut errors, "site.name", "   ");
        required(&mut errors, "site.slogan", "ok");
        optional_url(&mut errors, "site.termsUrl", Some("/terms"));
        optional_url(&mut errors, "site.privacyUrl", Some(""));
        optional_url(&mut errors, "branding.logo.url", Some("https://cdn.example.com/logo.png"));

        let errors = ValidationErrors(errors);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("site.name"), Some("is required"));
        assert_eq!(errors.for_field("site.termsUrl"), Some("must be an absolute URL"));
        assert_eq!(
            errors.to_string(),
            "site.name: is required, site.termsUrl: must be an absolute URL"
        );
    }
}
