//! Configuration document schema.
//!
//! Mirrors the `config.json` object stored in the bucket. Field names are
//! camelCase on the wire; absent optional fields are omitted when serialized
//! so a parse/serialize cycle does not grow the document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Version tag. Used as a display value and an editor cache key only.
    pub revision: u64,

    /// Basic site information.
    pub site: SiteInfo,

    /// Logo and favicon.
    pub branding: Branding,

    /// Theme colors.
    pub theme: Theme,

    /// Authentication policy.
    pub auth: AuthPolicy,
}

/// Site identity shown on auth pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    /// Site name (titles, meta tags, logo fallback).
    pub name: String,

    /// Tagline displayed on auth pages.
    pub slogan: String,

    /// Short description (sidebar, meta description).
    pub description: String,

    /// Footer copyright text.
    pub copyright: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<String>,
}

/// Branding assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub logo: Logo,

    /// Favicon path (e.g. `/favicon.svg`).
    #[serde(default)]
    pub favicon: String,
}

/// Logo configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    #[serde(rename = "type")]
    pub kind: LogoKind,

    /// Custom logo image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Text logo, used when no image is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Single letter or emoji for the icon badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Logo rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoKind {
    Image,
    #[default]
    Icon,
}

/// Theme colors (CSS color values).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Primary brand color (buttons, accents).
    pub brand_color: String,

    /// Secondary accent color.
    pub accent_color: String,

    pub gradient_from: String,
    pub gradient_via: String,
    pub gradient_to: String,
}

/// Authentication policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPolicy {
    /// Enabled OAuth provider identifiers, in display order.
    pub enabled_providers: Vec<String>,

    /// Allow new user registration.
    pub allow_signup: bool,

    /// Allow email/password authentication.
    pub allow_password: bool,

    pub turnstile: Turnstile,

    /// Length of the OTP code expected from the auth backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_options: Option<CookieOptions>,

    /// Cookie domain for cross-subdomain SSO (e.g. `.example.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<String>,
}

/// Turnstile CAPTCHA settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Turnstile {
    pub enabled: bool,
    pub site_key: String,
}

/// Session cookie settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieOptions {
    /// Expiration in days.
    pub expires: u32,
    pub same_site: SameSite,
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        };
        f.write_str(value)
    }
}

/// Top-level, object-valued sections of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Site,
    Branding,
    Theme,
    Auth,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Site, Section::Branding, Section::Theme, Section::Auth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Site => "site",
            Section::Branding => "branding",
            Section::Theme => "theme",
            Section::Auth => "auth",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a key does not name an object-valued section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a configuration section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Section::Site),
            "branding" => Ok(Section::Branding),
            "theme" => Ok(Section::Theme),
            "auth" => Ok(Section::Auth),
            other => Err(UnknownSection(other.to_string())),
        }
    }
}
