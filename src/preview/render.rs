//! Login-surface view model.
//!
//! Everything the login page needs from the document, resolved once: head
//! metadata, theme CSS variables, the logo, provider buttons and the auth
//! switches. The preview document wins when present; otherwise the committed
//! document is rendered.

use serde::Serialize;

use crate::site::defaults::DEFAULT_OTP_LENGTH;
use crate::site::providers;
use crate::site::{LogoKind, SiteConfig, Theme};

/// Suffix of the address shown in the preview browser chrome.
pub const PREVIEW_HOST_SUFFIX: &str = "auth.supabase.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub head: HeadView,
    pub theme: ThemeView,
    pub logo: LogoView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub terms_href: String,
    pub privacy_href: String,
    pub providers: Vec<ProviderButton>,
    pub password_allowed: bool,
    pub signup_allowed: bool,
    /// Present only when Turnstile is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnstile_site_key: Option<String>,
    pub otp_length: u32,
    pub preview_host: String,
    /// Rendered from the preview document rather than the committed one.
    pub is_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadView {
    pub title: String,
    pub description: String,
    pub favicon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeView {
    pub brand_color: String,
    pub accent_color: String,
    pub gradient_from: String,
    pub gradient_via: String,
    pub gradient_to: String,
    /// `:root { --config-*: ... }` block.
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogoView {
    Image { url: String, alt: String },
    Text { text: String, icon: String, background: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderButton {
    pub id: String,
    pub display_name: String,
    pub icon: &'static str,
    pub label: String,
    pub known: bool,
    pub is_primary: bool,
}

/// Render the login view.
///
/// `primary` moves that provider to the front and marks it; the rest keep
/// their configured order.
pub fn render_login(preview: Option<&SiteConfig>, committed: &SiteConfig, primary: Option<&str>) -> LoginView {
    let is_preview = preview.is_some();
    let config = preview.unwrap_or(committed);

    LoginView {
        head: HeadView {
            title: config.site.name.clone(),
            description: config.site.description.clone(),
            favicon: config.branding.favicon.clone(),
        },
        theme: theme_view(&config.theme),
        logo: logo_view(config),
        slogan: non_empty(&config.site.slogan),
        copyright: non_empty(&config.site.copyright),
        terms_href: link_or_hash(config.site.terms_url.as_deref()),
        privacy_href: link_or_hash(config.site.privacy_url.as_deref()),
        providers: provider_buttons(&config.auth.enabled_providers, primary),
        password_allowed: config.auth.allow_password,
        signup_allowed: config.auth.allow_signup,
        turnstile_site_key: config
            .auth
            .turnstile
            .enabled
            .then(|| config.auth.turnstile.site_key.clone()),
        otp_length: config.auth.otp_length.unwrap_or(DEFAULT_OTP_LENGTH),
        preview_host: preview_host(&config.site.name),
        is_preview,
    }
}

/// CSS custom properties for the theme.
pub fn theme_css(theme: &Theme) -> String {
    format!(
        ":root {{\n  --config-brand-color: {};\n  --config-accent-color: {};\n  --config-gradient-from: {};\n  --config-gradient-via: {};\n  --config-gradient-to: {};\n}}",
        theme.brand_color, theme.accent_color, theme.gradient_from, theme.gradient_via, theme.gradient_to
    )
}

fn theme_view(theme: &Theme) -> ThemeView {
    ThemeView {
        brand_color: theme.brand_color.clone(),
        accent_color: theme.accent_color.clone(),
        gradient_from: theme.gradient_from.clone(),
        gradient_via: theme.gradient_via.clone(),
        gradient_to: theme.gradient_to.clone(),
        css: theme_css(theme),
    }
}

fn logo_view(config: &SiteConfig) -> LogoView {
    let logo = &config.branding.logo;
    if logo.kind == LogoKind::Image {
        if let Some(url) = logo.url.as_deref().and_then(non_empty) {
            return LogoView::Image {
                url,
                alt: config.site.name.clone(),
            };
        }
    }

    let text = logo
        .text
        .as_deref()
        .and_then(non_empty)
        .unwrap_or_else(|| config.site.name.clone());
    let icon = logo
        .icon
        .as_deref()
        .and_then(non_empty)
        .or_else(|| text.chars().next().map(String::from))
        .unwrap_or_else(|| "A".to_string());

    LogoView::Text {
        text,
        icon,
        background: config.theme.brand_color.clone(),
    }
}

fn provider_buttons(enabled: &[String], primary: Option<&str>) -> Vec<ProviderButton> {
    let mut ordered: Vec<&String> = enabled.iter().collect();
    if let Some(primary) = primary {
        // Stable: only the primary moves.
        ordered.sort_by_key(|p| p.as_str() != primary);
    }

    ordered
        .into_iter()
        .map(|id| {
            let resolved = providers::resolve(id);
            ProviderButton {
                id: id.clone(),
                label: format!("Continue with {}", resolved.display_name),
                display_name: resolved.display_name.into_owned(),
                icon: resolved.icon,
                known: resolved.known,
                is_primary: primary == Some(id.as_str()),
            }
        })
        .collect()
}

/// `{site-name-slug}.auth.supabase.com`.
pub fn preview_host(site_name: &str) -> String {
    let slug = site_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}.{}", slug, PREVIEW_HOST_SUFFIX)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn link_or_hash(url: Option<&str>) -> String {
    url.and_then(non_empty).unwrap_or_else(|| "#".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{default_config, Logo};

    #[test]
    fn test_unknown_provider_renders_with_fallback() {
        let mut config = default_config();
        config.auth.enabled_providers = vec!["google".into(), "totallyUnknownProvider".into()];

        let view = render_login(None, &config, None);
        assert_eq!(view.providers.len(), 2);
        assert_eq!(view.providers[0].display_name, "Google");
        assert_eq!(view.providers[0].label, "Continue with Google");
        assert!(view.providers[0].known);
        assert_eq!(view.providers[1].display_name, "Totallyunknownprovider");
        assert_eq!(view.providers[1].icon, providers::GENERIC_ICON);
        assert!(!view.providers[1].known);
    }

    #[test]
    fn test_preview_wins_over_committed() {
        let committed = default_config();
        let mut preview = default_config();
        preview.theme.brand_color = "#FF0000".into();

        let view = render_login(Some(&preview), &committed, None);
        assert!(view.is_preview);
        assert_eq!(view.theme.brand_color, "#FF0000");
        assert!(view.theme.css.contains("--config-brand-color: #FF0000;"));

        let view = render_login(None, &committed, None);
        assert!(!view.is_preview);
        assert_eq!(view.theme.brand_color, "#10B981");
    }

    #[test]
    fn test_logo_variants() {
        let mut config = default_config();
        assert_eq!(
            logo_view(&config),
            LogoView::Text {
                text: "Supabase Auth".into(),
                icon: "S".into(),
                background: "#10B981".into()
            }
        );

        config.branding.logo = Logo {
            kind: LogoKind::Image,
            url: Some("https://cdn.example.com/logo.png".into()),
            text: None,
            icon: None,
        };
        assert_eq!(
            logo_view(&config),
            LogoView::Image {
                url: "https://cdn.example.com/logo.png".into(),
                alt: "Supabase Auth".into()
            }
        );

        config.branding.logo.url = None;
        assert!(matches!(logo_view(&config), LogoView::Text { .. }));
    }

    #[test]
    fn test_primary_provider_first() {
        let mut config = default_config();
        config.auth.enabled_providers = vec!["google".into(), "github".into(), "discord".into()];

        let view = render_login(None, &config, Some("discord"));
        let ids: Vec<_> = view.providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["discord", "google", "github"]);
        assert!(view.providers[0].is_primary);
        assert!(!view.providers[1].is_primary);
    }

    #[test]
    fn test_switches_and_defaults() {
        let mut config = default_config();
        config.auth.otp_length = None;
        config.auth.allow_password = false;
        config.auth.turnstile.enabled = true;
        config.auth.turnstile.site_key = "0xKEY".into();
        config.site.terms_url = Some("https://example.com/terms".into());

        let view = render_login(None, &config, None);
        assert_eq!(view.otp_length, 8);
        assert!(!view.password_allowed);
        assert!(view.signup_allowed);
        assert_eq!(view.turnstile_site_key.as_deref(), Some("0xKEY"));
        assert_eq!(view.terms_href, "https://example.com/terms");
        assert_eq!(view.privacy_href, "#");
        assert_eq!(view.head.favicon, "/favicon.svg");
    }

    #[test]
    fn test_preview_host() {
        assert_eq!(preview_host("Supabase Auth"), "supabase-auth.auth.supabase.com");
        assert_eq!(preview_host("Acme  Corp ID"), "acme-corp-id.auth.supabase.com");
    }
}
