//! OAuth provider registry.
//!
//! Provider metadata lives in code; the stored document only lists which
//! identifiers are enabled. Lookup is case-insensitive and never fails:
//! identifiers missing from the table get a generated fallback record.

use serde::Serialize;
use std::borrow::Cow;

/// Icon used for providers that are not in the registry.
pub const GENERIC_ICON: &str = "key-round";

/// Static metadata for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub name: &'static str,
    pub display_name: &'static str,
    /// Icon identifier understood by the front-end icon set.
    pub icon: &'static str,
    pub default_scopes: Option<&'static str>,
    pub description: &'static str,
}

const fn provider(
    name: &'static str,
    display_name: &'static str,
    icon: &'static str,
    default_scopes: Option<&'static str>,
    description: &'static str,
) -> ProviderMetadata {
    ProviderMetadata {
        name,
        display_name,
        icon,
        default_scopes,
        description,
    }
}

/// All supported providers, in the order the console lists them.
pub static AUTH_PROVIDERS: &[ProviderMetadata] = &[
    provider("google", "Google", "si-google", Some("openid email profile"), "Sign in with your Google account"),
    provider("github", "GitHub", "si-github", Some("read:user user:email"), "Sign in with your GitHub account"),
    provider("gitlab", "GitLab", "si-gitlab", Some("read_user"), "Sign in with your GitLab account"),
    provider("apple", "Apple", "si-apple", Some("name email"), "Sign in with Apple"),
    provider("microsoft", "Microsoft", "fa-microsoft", Some("openid email profile"), "Sign in with your Microsoft account"),
    provider("azure", "Azure AD", "fa-microsoft", Some("openid email profile"), "Sign in with Azure Active Directory"),
    provider("facebook", "Facebook", "si-facebook", Some("email"), "Sign in with your Facebook account"),
    provider("twitter", "X (Twitter)", "si-x", None, "Sign in with X (formerly Twitter)"),
    provider("x", "X", "si-x", None, "Sign in with X"),
    provider("discord", "Discord", "si-discord", Some("identify email"), "Sign in with your Discord account"),
    provider("slack", "Slack", "si-slack", Some("identity.basic identity.email"), "Sign in with your Slack workspace"),
    provider("slack_oidc", "Slack (OIDC)", "si-slack", Some("openid email profile"), "Sign in with Slack (OpenID Connect)"),
    provider("linkedin", "LinkedIn", "si-linkedin", Some("r_liteprofile r_emailaddress"), "Sign in with your LinkedIn account"),
    provider("linkedin_oidc", "LinkedIn (OIDC)", "si-linkedin", Some("openid email profile"), "Sign in with LinkedIn (OpenID Connect)"),
    provider("bitbucket", "Bitbucket", "si-bitbucket", Some("account email"), "Sign in with your Bitbucket account"),
    provider("notion", "Notion", "si-notion", None, "Sign in with your Notion account"),
    provider("figma", "Figma", "si-figma", Some("file_read"), "Sign in with your Figma account"),
    provider("spotify", "Spotify", "si-spotify", Some("user-read-email user-read-private"), "Sign in with your Spotify account"),
    provider("twitch", "Twitch", "si-twitch", Some("user:read:email"), "Sign in with your Twitch account"),
    provider("kakao", "Kakao", "si-kakao", None, "Sign in with your Kakao account"),
    provider("keycloak", "Keycloak", "si-keycloak", Some("openid email profile"), "Sign in with Keycloak"),
    provider("zoom", "Zoom", "si-zoom", Some("user:read"), "Sign in with your Zoom account"),
    provider("fly", "Fly.io", "si-flydotio", None, "Sign in with Fly.io"),
    provider("workos", "WorkOS", GENERIC_ICON, None, "Sign in with WorkOS SSO"),
];

/// Provider metadata resolved for display, known or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProvider {
    pub name: Cow<'static, str>,
    pub display_name: Cow<'static, str>,
    pub icon: &'static str,
    pub default_scopes: Option<&'static str>,
    pub description: Cow<'static, str>,
    /// False when built from the fallback constructor.
    pub known: bool,
}

impl From<&'static ProviderMetadata> for ResolvedProvider {
    fn from(meta: &'static ProviderMetadata) -> Self {
        Self {
            name: Cow::Borrowed(meta.name),
            display_name: Cow::Borrowed(meta.display_name),
            icon: meta.icon,
            default_scopes: meta.default_scopes,
            description: Cow::Borrowed(meta.description),
            known: true,
        }
    }
}

impl ResolvedProvider {
    /// Fallback record for an identifier missing from the registry.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: Cow::Owned(name.to_string()),
            display_name: Cow::Owned(fallback_display_name(name)),
            icon: GENERIC_ICON,
            default_scopes: None,
            description: Cow::Owned(format!("Sign in with {}", name)),
            known: false,
        }
    }
}

/// Registry lookup without fallback.
pub fn find(name: &str) -> Option<&'static ProviderMetadata> {
    AUTH_PROVIDERS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Registry lookup with the fallback record for unknown identifiers.
pub fn resolve(name: &str) -> ResolvedProvider {
    match find(name) {
        Some(meta) => meta.into(),
        None => ResolvedProvider::fallback(name),
    }
}

/// Identifiers of every registered provider.
pub fn available() -> impl Iterator<Item = &'static str> {
    AUTH_PROVIDERS.iter().map(|p| p.name)
}

fn fallback_display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_provider() {
        let google = resolve("google");
        assert!(google.known);
        assert_eq!(google.display_name, "Google");
        assert_eq!(google.default_scopes, Some("openid email profile"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(resolve("GitHub").display_name, "GitHub");
        assert!(find("LINKEDIN_OIDC").is_some());
    }

    #[test]
    fn test_unknown_provider_fallback() {
        let unknown = resolve("totallyUnknownProvider");
        assert!(!unknown.known);
        assert_eq!(unknown.name, "totallyUnknownProvider");
        assert_eq!(unknown.display_name, "Totallyunknownprovider");
        assert_eq!(unknown.icon, GENERIC_ICON);
        assert_eq!(unknown.description, "Sign in with totallyUnknownProvider");
    }

    #[test]
    fn test_empty_identifier() {
        let empty = resolve("");
        assert_eq!(empty.display_name, "");
        assert!(!empty.known);
    }

    #[test]
    fn test_registry_identifiers_unique() {
        let names: Vec<_> = available().collect();
        assert_eq!(names.len(), 24);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }
}
