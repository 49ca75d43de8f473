//! Admin session subsystem.
//!
//! # Data Flow
//! ```text
//! caller email
//!     → access.rs (allow-list → is_admin)
//!     → admin.rs  (AdminSession::start: exists? → load → Ready)
//!
//! section save:
//!     editor on_save → AdminSession::update_config(patch)
//!         → merge into in-memory document (visible immediately)
//!         → ConfigRepository::save (whole document)
//!         → save-success flag for 3 s, or last_error + unsaved
//!
//! cookie writes:
//!     cookie.rs reads ConfigCache synchronously
//! ```
//!
//! # Design Decisions
//! - The admin flag is a capability gate for editing surfaces; storage
//!   access rules remain the real authority
//! - Optimistic updates are never rolled back; a failed save leaves the
//!   session marked `unsaved` until a later save succeeds
//! - No revision check at save time: last writer wins

pub mod access;
pub mod admin;
pub mod cookie;

pub use access::AdminAllowList;
pub use admin::{AdminSession, SessionError, SessionPhase, SessionResult, SessionSnapshot, SAVE_SUCCESS_WINDOW};
pub use cookie::CookiePolicy;
