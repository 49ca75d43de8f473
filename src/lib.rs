//! Auth site configuration sync and live preview.
//!
//! # Architecture Overview
//!
//! ```text
//!   object storage (auth-site/config.json)
//!          │
//!          ▼
//!   ┌─────────────┐   ┌────────────┐   ┌───────────────┐
//!   │   storage   │──▶│ repository │──▶│    session    │◀── editor (section drafts)
//!   │ supabase /  │   │ + cache    │   │ AdminSession  │         │
//!   │   memory    │◀──│            │◀──│ update_config │         ▼
//!   └─────────────┘   └────────────┘   └───────────────┘   preview store ──▶ preview render
//!                           │
//!                           ▼
//!                   cookie policy, /config, /login
//! ```
//!
//! The `http` and `admin` modules expose all of it over axum; `settings`,
//! `observability` and `lifecycle` carry the service plumbing.

// Document model
pub mod site;

// Persistence
pub mod repository;
pub mod storage;

// Editing
pub mod editor;
pub mod preview;
pub mod session;

// Service surface
pub mod admin;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod settings;

pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use repository::{ConfigCache, ConfigRepository};
pub use settings::ServiceSettings;
pub use site::SiteConfig;
