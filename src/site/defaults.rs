//! Default configuration document, written on first-time setup.

use crate::site::schema::{
    AuthPolicy, Branding, CookieOptions, Logo, LogoKind, SameSite, SiteConfig, SiteInfo, Theme,
    Turnstile,
};

/// OTP length assumed when the document does not set one.
pub const DEFAULT_OTP_LENGTH: u32 = 8;

/// Cookie lifetime assumed when the document does not set one.
pub const DEFAULT_COOKIE_EXPIRES_DAYS: u32 = 365;

/// Build the default configuration document.
pub fn default_config() -> SiteConfig {
    SiteConfig {
        revision: 1,
        site: SiteInfo {
            name: "Supabase Auth".to_string(),
            slogan: "Secure Authentication Made Simple".to_string(),
            description: "Sign in to access your account".to_string(),
            copyright: "© 2025 Supabase Auth Site".to_string(),
            terms_url: None,
            privacy_url: None,
        },
        branding: Branding {
            logo: Logo {
                kind: LogoKind::Icon,
                url: None,
                text: None,
                icon: None,
            },
            favicon: "/favicon.svg".to_string(),
        },
        theme: Theme {
            brand_color: "#10B981".to_string(),
            accent_color: "#14B8A6".to_string(),
            gradient_from: "#059669".to_string(),
            gradient_via: "#0D9488".to_string(),
            gradient_to: "#0891B2".to_string(),
        },
        auth: AuthPolicy {
            enabled_providers: vec!["google".to_string(), "github".to_string()],
            allow_signup: true,
            allow_password: true,
            turnstile: Turnstile {
                enabled: false,
                site_key: String::new(),
            },
            otp_length: Some(DEFAULT_OTP_LENGTH),
            cookie_options: Some(CookieOptions {
                expires: DEFAULT_COOKIE_EXPIRES_DAYS,
                same_site: SameSite::Lax,
            }),
            cookie_domain: None,
        },
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        default_config()
    }
}
