//! Section patches and the shallow merge rule.
//!
//! A patch names some top-level keys of one section. Merging replaces each
//! named key and keeps every key the patch leaves out. Nested objects
//! (`logo`, `turnstile`, `cookieOptions`) are single keys: a patch that names
//! them replaces them whole.
//!
//! Optional document fields take a tri-state in patches: absent keeps the
//! current value, `null` clears it, a value sets it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::site::schema::{
    AuthPolicy, Branding, CookieOptions, Logo, Section, SiteConfig, SiteInfo, Theme, Turnstile,
};

/// Merge a partial value into `self`.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

fn tri_state<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn replace<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, deserialize_with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub terms_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<Option<String>>,
}

impl Merge for SiteInfo {
    type Patch = SitePatch;

    fn merge(&mut self, patch: SitePatch) {
        replace(&mut self.name, patch.name);
        replace(&mut self.slogan, patch.slogan);
        replace(&mut self.description, patch.description);
        replace(&mut self.copyright, patch.copyright);
        replace(&mut self.terms_url, patch.terms_url);
        replace(&mut self.privacy_url, patch.privacy_url);
    }
}

impl From<SiteInfo> for SitePatch {
    fn from(site: SiteInfo) -> Self {
        Self {
            name: Some(site.name),
            slogan: Some(site.slogan),
            description: Some(site.description),
            copyright: Some(site.copyright),
            terms_url: Some(site.terms_url),
            privacy_url: Some(site.privacy_url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BrandingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl Merge for Branding {
    type Patch = BrandingPatch;

    fn merge(&mut self, patch: BrandingPatch) {
        replace(&mut self.logo, patch.logo);
        replace(&mut self.favicon, patch.favicon);
    }
}

impl From<Branding> for BrandingPatch {
    fn from(branding: Branding) -> Self {
        Self {
            logo: Some(branding.logo),
            favicon: Some(branding.favicon),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_via: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_to: Option<String>,
}

impl Merge for Theme {
    type Patch = ThemePatch;

    fn merge(&mut self, patch: ThemePatch) {
        replace(&mut self.brand_color, patch.brand_color);
        replace(&mut self.accent_color, patch.accent_color);
        replace(&mut self.gradient_from, patch.gradient_from);
        replace(&mut self.gradient_via, patch.gradient_via);
        replace(&mut self.gradient_to, patch.gradient_to);
    }
}

impl From<Theme> for ThemePatch {
    fn from(theme: Theme) -> Self {
        Self {
            brand_color: Some(theme.brand_color),
            accent_color: Some(theme.accent_color),
            gradient_from: Some(theme.gradient_from),
            gradient_via: Some(theme.gradient_via),
            gradient_to: Some(theme.gradient_to),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_providers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_signup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnstile: Option<Turnstile>,
    #[serde(default, deserialize_with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub otp_length: Option<Option<u32>>,
    #[serde(default, deserialize_with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub cookie_options: Option<Option<CookieOptions>>,
    #[serde(default, deserialize_with = "tri_state", skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<Option<String>>,
}

impl Merge for AuthPolicy {
    type Patch = AuthPatch;

    fn merge(&mut self, patch: AuthPatch) {
        replace(&mut self.enabled_providers, patch.enabled_providers);
        replace(&mut self.allow_signup, patch.allow_signup);
        replace(&mut self.allow_password, patch.allow_password);
        replace(&mut self.turnstile, patch.turnstile);
        replace(&mut self.otp_length, patch.otp_length);
        replace(&mut self.cookie_options, patch.cookie_options);
        replace(&mut self.cookie_domain, patch.cookie_domain);
    }
}

impl From<AuthPolicy> for AuthPatch {
    fn from(auth: AuthPolicy) -> Self {
        Self {
            enabled_providers: Some(auth.enabled_providers),
            allow_signup: Some(auth.allow_signup),
            allow_password: Some(auth.allow_password),
            turnstile: Some(auth.turnstile),
            otp_length: Some(auth.otp_length),
            cookie_options: Some(auth.cookie_options),
            cookie_domain: Some(auth.cookie_domain),
        }
    }
}

/// A patch aimed at exactly one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionPatch {
    Site(SitePatch),
    Branding(BrandingPatch),
    Theme(ThemePatch),
    Auth(AuthPatch),
}

impl SectionPatch {
    pub fn section(&self) -> Section {
        match self {
            SectionPatch::Site(_) => Section::Site,
            SectionPatch::Branding(_) => Section::Branding,
            SectionPatch::Theme(_) => Section::Theme,
            SectionPatch::Auth(_) => Section::Auth,
        }
    }

    /// Deserialize a JSON object as the patch type of `section`.
    pub fn from_json(section: Section, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match section {
            Section::Site => SectionPatch::Site(serde_json::from_value(value)?),
            Section::Branding => SectionPatch::Branding(serde_json::from_value(value)?),
            Section::Theme => SectionPatch::Theme(serde_json::from_value(value)?),
            Section::Auth => SectionPatch::Auth(serde_json::from_value(value)?),
        })
    }
}

/// A patch over one or more sections of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SitePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<BrandingPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthPatch>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    /// Sections this patch touches.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::new();
        if self.site.is_some() {
            sections.push(Section::Site);
        }
        if self.branding.is_some() {
            sections.push(Section::Branding);
        }
        if self.theme.is_some() {
            sections.push(Section::Theme);
        }
        if self.auth.is_some() {
            sections.push(Section::Auth);
        }
        sections
    }
}

impl From<SectionPatch> for ConfigPatch {
    fn from(patch: SectionPatch) -> Self {
        let mut out = ConfigPatch::default();
        match patch {
            SectionPatch::Site(p) => out.site = Some(p),
            SectionPatch::Branding(p) => out.branding = Some(p),
            SectionPatch::Theme(p) => out.theme = Some(p),
            SectionPatch::Auth(p) => out.auth = Some(p),
        }
        out
    }
}

impl Merge for SiteConfig {
    type Patch = ConfigPatch;

    fn merge(&mut self, patch: ConfigPatch) {
        if let Some(p) = patch.site {
            self.site.merge(p);
        }
        if let Some(p) = patch.branding {
            self.branding.merge(p);
        }
        if let Some(p) = patch.theme {
            self.theme.merge(p);
        }
        if let Some(p) = patch.auth {
            self.auth.merge(p);
        }
    }
}

impl SiteConfig {
    /// Merge a single-section patch.
    pub fn apply_section(&mut self, patch: SectionPatch) {
        self.merge(ConfigPatch::from(patch));
    }
}
