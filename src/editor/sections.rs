//! The four editable sections.

use crate::editor::validation::{hex_color, optional_url, required, FieldError};
use crate::editor::{EditableSection, EditorError, SectionEditor};
use crate::site::providers::{self, ProviderMetadata, AUTH_PROVIDERS};
use crate::site::{AuthPolicy, Branding, LogoKind, Section, SectionPatch, SiteConfig, SiteInfo, Theme};

/// Allowed OTP code lengths.
pub const OTP_LENGTH_RANGE: std::ops::RangeInclusive<u32> = 6..=10;

/// Longest accepted logo badge.
pub const MAX_LOGO_ICON_CHARS: usize = 2;

impl EditableSection for SiteInfo {
    const SECTION: Section = Section::Site;
    const LIVE_PREVIEW: bool = false;

    fn from_config(config: &SiteConfig) -> Self {
        config.site.clone()
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "site.name", &self.name);
        required(&mut errors, "site.slogan", &self.slogan);
        required(&mut errors, "site.description", &self.description);
        required(&mut errors, "site.copyright", &self.copyright);
        optional_url(&mut errors, "site.termsUrl", self.terms_url.as_deref());
        optional_url(&mut errors, "site.privacyUrl", self.privacy_url.as_deref());
        errors
    }

    fn into_patch(self) -> SectionPatch {
        SectionPatch::Site(self.into())
    }
}

impl EditableSection for Branding {
    const SECTION: Section = Section::Branding;
    const LIVE_PREVIEW: bool = true;

    fn from_config(config: &SiteConfig) -> Self {
        config.branding.clone()
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        required(&mut errors, "branding.favicon", &self.favicon);
        optional_url(&mut errors, "branding.logo.url", self.logo.url.as_deref());

        if let Some(icon) = &self.logo.icon {
            if icon.chars().count() > MAX_LOGO_ICON_CHARS {
                errors.push(FieldError::new(
                    "branding.logo.icon",
                    format!("must be at most {} characters", MAX_LOGO_ICON_CHARS),
                ));
            }
        }

        let has_url = self.logo.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        if self.logo.kind == LogoKind::Image && !has_url {
            errors.push(FieldError::new("branding.logo.url", "is required for an image logo"));
        }
        errors
    }

    fn into_patch(self) -> SectionPatch {
        SectionPatch::Branding(self.into())
    }
}

impl EditableSection for Theme {
    const SECTION: Section = Section::Theme;
    const LIVE_PREVIEW: bool = true;

    fn from_config(config: &SiteConfig) -> Self {
        config.theme.clone()
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        hex_color(&mut errors, "theme.brandColor", &self.brand_color);
        hex_color(&mut errors, "theme.accentColor", &self.accent_color);
        hex_color(&mut errors, "theme.gradientFrom", &self.gradient_from);
        hex_color(&mut errors, "theme.gradientVia", &self.gradient_via);
        hex_color(&mut errors, "theme.gradientTo", &self.gradient_to);
        errors
    }

    fn into_patch(self) -> SectionPatch {
        SectionPatch::Theme(self.into())
    }
}

impl EditableSection for AuthPolicy {
    const SECTION: Section = Section::Auth;
    const LIVE_PREVIEW: bool = false;

    fn from_config(config: &SiteConfig) -> Self {
        config.auth.clone()
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.turnstile.enabled {
            required(&mut errors, "auth.turnstile.siteKey", &self.turnstile.site_key);
        }
        if let Some(length) = self.otp_length {
            if !OTP_LENGTH_RANGE.contains(&length) {
                errors.push(FieldError::new(
                    "auth.otpLength",
                    format!(
                        "must be between {} and {}",
                        OTP_LENGTH_RANGE.start(),
                        OTP_LENGTH_RANGE.end()
                    ),
                ));
            }
        }
        if let Some(options) = &self.cookie_options {
            if options.expires == 0 {
                errors.push(FieldError::new("auth.cookieOptions.expires", "must be at least 1 day"));
            }
        }
        errors
    }

    fn into_patch(self) -> SectionPatch {
        SectionPatch::Auth(self.into())
    }
}

impl SectionEditor<AuthPolicy> {
    /// Enable `id` if absent, otherwise disable it. Order is preserved and
    /// newly enabled providers go last.
    pub fn toggle_provider(&mut self, id: &str) -> Result<bool, EditorError> {
        let mut enabled = false;
        self.edit(|auth| {
            let before = auth.enabled_providers.len();
            auth.enabled_providers.retain(|p| p != id);
            if auth.enabled_providers.len() == before {
                auth.enabled_providers.push(id.to_string());
                enabled = true;
            }
        })?;
        Ok(enabled)
    }

    /// Every provider in the registry, for the picker.
    pub fn available_providers(&self) -> &'static [ProviderMetadata] {
        AUTH_PROVIDERS
    }

    /// Enabled identifiers the registry does not know.
    pub fn unknown_providers(&self) -> Vec<&str> {
        self.draft()
            .enabled_providers
            .iter()
            .filter(|p| providers::find(p).is_none())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{default_config, CookieOptions, Logo, SameSite};

    #[test]
    fn test_default_document_is_valid() {
        let config = default_config();
        assert!(SiteInfo::from_config(&config).validate().is_empty());
        assert!(Branding::from_config(&config).validate().is_empty());
        assert!(Theme::from_config(&config).validate().is_empty());
        assert!(AuthPolicy::from_config(&config).validate().is_empty());
    }

    #[test]
    fn test_theme_rejects_named_color() {
        let mut theme = default_config().theme;
        theme.brand_color = "red".into();
        let errors = theme.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "theme.brandColor");

        theme.brand_color = "#10B981".into();
        assert!(theme.validate().is_empty());
    }

    #[test]
    fn test_site_collects_every_error() {
        let mut site = default_config().site;
        site.name = String::new();
        site.copyright = " ".into();
        site.privacy_url = Some("privacy.html".into());
        site.terms_url = Some(String::new());

        let fields: Vec<_> = site.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["site.name", "site.copyright", "site.privacyUrl"]);
    }

    #[test]
    fn test_branding_rules() {
        let mut branding = default_config().branding;
        branding.favicon = String::new();
        branding.logo = Logo {
            kind: LogoKind::Image,
            url: None,
            text: None,
            icon: Some("ABC".into()),
        };
        let fields: Vec<_> = branding.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["branding.favicon", "branding.logo.icon", "branding.logo.url"]);

        branding.favicon = "/favicon.ico".into();
        branding.logo.icon = Some("🔐".into());
        branding.logo.url = Some("https://cdn.example.com/logo.svg".into());
        assert!(branding.validate().is_empty());
    }

    #[test]
    fn test_auth_rules() {
        let mut auth = default_config().auth;
        auth.turnstile.enabled = true;
        auth.otp_length = Some(4);
        auth.cookie_options = Some(CookieOptions {
            expires: 0,
            same_site: SameSite::Strict,
        });
        let fields: Vec<_> = auth.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["auth.turnstile.siteKey", "auth.otpLength", "auth.cookieOptions.expires"]
        );

        auth.turnstile.site_key = "0x4AAAAAAA".into();
        auth.otp_length = Some(6);
        auth.cookie_options = None;
        auth.enabled_providers = vec!["google".into(), "google".into()];
        assert!(auth.validate().is_empty());
    }

    #[test]
    fn test_toggle_provider() {
        let mut editor = SectionEditor::<AuthPolicy>::from_config(&default_config(), true);
        assert!(editor.toggle_provider("discord").unwrap());
        assert_eq!(editor.draft().enabled_providers, vec!["google", "github", "discord"]);

        assert!(!editor.toggle_provider("google").unwrap());
        assert_eq!(editor.draft().enabled_providers, vec!["github", "discord"]);

        editor.toggle_provider("myCustomIdp").unwrap();
        assert_eq!(editor.unknown_providers(), vec!["myCustomIdp"]);
        assert_eq!(editor.available_providers().len(), 24);
    }

    #[test]
    fn test_toggle_provider_read_only() {
        let mut editor = SectionEditor::<AuthPolicy>::from_config(&default_config(), false);
        assert!(matches!(editor.toggle_provider("discord"), Err(EditorError::ReadOnly)));
    }

    #[test]
    fn test_live_preview_sections() {
        assert!(Theme::LIVE_PREVIEW);
        assert!(Branding::LIVE_PREVIEW);
        assert!(!SiteInfo::LIVE_PREVIEW);
        assert!(!AuthPolicy::LIVE_PREVIEW);
    }
}
