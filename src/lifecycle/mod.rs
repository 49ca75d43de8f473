//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → Storage backend → Repository (+ cache warm-up) → AppState
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then storage, then listeners
//! - In-flight saves finish before the server stops

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
