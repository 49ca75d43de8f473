//! Service settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (SUPABASE_URL, SUPABASE_ANON_KEY, ADMIN_EMAILS, AUTH_SITE_BIND)
//!     → validation.rs (semantic checks)
//!     → ServiceSettings (validated, immutable)
//!     → lifecycle::startup builds storage, repository and app state
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{
    AdminSettings, CookieSettings, ListenerSettings, LogFormat, ObservabilityConfig, ServiceSettings,
    StorageBackend, StorageSettings,
};
pub use validation::ValidationError;
