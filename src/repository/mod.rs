//! Configuration repository subsystem.
//!
//! # Data Flow
//! ```text
//! exists():     ObjectStore::list → contains config.json?  (errors → false)
//!
//! load():       ObjectStore::download
//!                 → on error: public_url + plain GET (tried once)
//!                 → parse → ConfigCache::set
//!
//! initialize(): default_config → save()
//!
//! save():       pretty JSON (2 spaces) → ObjectStore::upload (upsert)
//!                 → ConfigCache::set
//! ```
//!
//! # Design Decisions
//! - Whole-document writes only; no field-level persistence
//! - The download fallback is a chain, not a retry loop
//! - `load()` collapses every failure to `None`; `load_detailed()` keeps
//!   "missing" apart from "unreachable" so nothing initializes over an
//!   existing document by accident
//! - The cache is an explicit object shared by `Arc`, not process state

pub mod cache;
pub mod repo;

pub use cache::ConfigCache;
pub use repo::{ConfigError, ConfigRepository, ConfigResult, LoadOutcome, CONFIG_BUCKET, CONFIG_FILE};
