//! Object storage subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigRepository
//!     → ObjectStore::list      (existence check)
//!     → ObjectStore::download  (authenticated read)
//!     → ObjectStore::public_url (fallback read via plain GET)
//!     → ObjectStore::upload    (upsert write)
//!
//! Implementations:
//!     supabase.rs → Supabase Storage REST API (reqwest)
//!     memory.rs   → in-process map with fault injection
//! ```
//!
//! # Design Decisions
//! - A store instance is bound to one bucket
//! - The store is an opaque blob store; it never parses what it holds
//! - Errors keep the backend message so callers can surface it verbatim

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use memory::MemoryStore;
pub use supabase::SupabaseStorage;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("storage returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend is unreachable or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Store construction failed.
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    /// The backend-facing message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            StorageError::Status { message, .. } => message.clone(),
            StorageError::Unavailable(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObjectInfo {
    pub name: String,
}

/// Options for [`ObjectStore::upload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Overwrite an existing object instead of failing.
    pub upsert: bool,
    pub content_type: &'static str,
}

impl UploadOptions {
    /// JSON document, overwrite if present.
    pub const fn json_upsert() -> Self {
        Self {
            upsert: true,
            content_type: "application/json",
        }
    }
}

/// A key/blob store scoped to one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the objects at the bucket root whose names contain `search`.
    ///
    /// An empty `search` lists everything the backend returns in one page.
    async fn list(&self, search: &str) -> StorageResult<Vec<ObjectInfo>>;

    /// Authenticated download of one object.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Public URL of an object, when the bucket exposes one.
    fn public_url(&self, key: &str) -> Option<Url>;

    /// Write one object.
    async fn upload(&self, key: &str, body: Vec<u8>, options: UploadOptions) -> StorageResult<()>;
}
