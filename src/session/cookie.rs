//! Session cookie attributes derived from the cached configuration.
//!
//! Cookie writes happen synchronously, so this reads [`ConfigCache`] and
//! never fetches. Missing values fall back to the default document.

use serde::Serialize;

use crate::repository::ConfigCache;
use crate::settings::CookieSettings;
use crate::site::defaults::DEFAULT_COOKIE_EXPIRES_DAYS;
use crate::site::{default_config, SameSite};

/// Attributes for the auth session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookiePolicy {
    pub expires_days: u32,
    pub same_site: SameSite,
    pub domain: String,
    pub path: &'static str,
    pub secure: bool,
}

impl CookiePolicy {
    /// Resolve attributes for a request to `host`.
    ///
    /// Domain precedence: document `cookieDomain`, then the service
    /// setting, then the request host.
    pub fn resolve(cache: &ConfigCache, settings: &CookieSettings, host: &str) -> Self {
        let config = cache.get().map(|c| (*c).clone()).unwrap_or_else(default_config);
        let options = config
            .auth
            .cookie_options
            .clone()
            .or_else(|| default_config().auth.cookie_options);

        let domain = config
            .auth
            .cookie_domain
            .filter(|d| !d.is_empty())
            .or_else(|| settings.domain.clone().filter(|d| !d.is_empty()))
            .unwrap_or_else(|| strip_port(host).to_string());

        Self {
            expires_days: options
                .as_ref()
                .map(|o| o.expires)
                .unwrap_or(DEFAULT_COOKIE_EXPIRES_DAYS),
            same_site: options.map(|o| o.same_site).unwrap_or_default(),
            domain,
            path: "/",
            secure: settings.secure,
        }
    }

    /// `Set-Cookie` attribute suffix (everything after `name=value`).
    pub fn attributes(&self) -> String {
        let max_age = u64::from(self.expires_days) * 24 * 60 * 60;
        let mut out = format!(
            "Path={}; Domain={}; Max-Age={}; SameSite={}",
            self.path, self.domain, max_age, self.same_site
        );
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 literal: keep the bracketed address.
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
