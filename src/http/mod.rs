//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! request
//!     → request.rs (x-request-id) → tracing span → timeout → metrics
//!     → handlers.rs (public: /health, /config, /login, /session/cookie-policy)
//!     → admin (caller email → session, editors, preview)
//!     → response.rs (errors as {"error": ...})
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
