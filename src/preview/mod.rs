//! Live preview subsystem.
//!
//! # Data Flow
//! ```text
//! enter console
//!     → store.rs (PreviewStore seeded with the committed document)
//!
//! Theme / Branding editor change
//!     → PreviewStore::update_section (shallow merge, notify subscribers)
//!     → render.rs (LoginView from preview, else committed document)
//!
//! exit console
//!     → store dropped
//! ```
//!
//! # Design Decisions
//! - The preview document is a separate copy; nothing here reaches storage
//! - Subscribers receive the whole document, not the changed section
//! - Updates against an empty store are no-ops

pub mod render;
pub mod store;

pub use render::{render_login, LoginView, LogoView, ProviderButton};
pub use store::{PreviewState, PreviewStore};
