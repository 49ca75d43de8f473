//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (one span per request with its request ID)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all subsystems via the request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod tracing;
