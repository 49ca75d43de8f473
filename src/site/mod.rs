//! Site configuration document.
//!
//! # Data Flow
//! ```text
//! config.json (object storage)
//!     → schema.rs (SiteConfig, camelCase JSON)
//!     → patch.rs (section patches, explicit shallow merge)
//!     → providers.rs (enabledProviders → display metadata)
//!
//! First admin visit with no stored document:
//!     defaults.rs → repository initialize → config.json
//! ```
//!
//! # Design Decisions
//! - The document is one unit; storage always receives the whole object
//! - Sections merge through typed patches, never through untyped JSON
//! - Unknown provider identifiers resolve to a fallback record, not an error

pub mod defaults;
pub mod patch;
pub mod providers;
pub mod schema;

pub use defaults::default_config;
pub use patch::{AuthPatch, BrandingPatch, ConfigPatch, Merge, SectionPatch, SitePatch, ThemePatch};
pub use providers::{ProviderMetadata, ResolvedProvider};
pub use schema::{
    AuthPolicy, Branding, CookieOptions, Logo, LogoKind, SameSite, Section, SiteConfig, SiteInfo,
    Theme, Turnstile,
};
