//! In-memory object store.
//!
//! Used by tests and by the `memory` storage backend for local development.
//! Each operation can be switched to fail so outage paths can be exercised.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use url::Url;

use crate::storage::{ObjectInfo, ObjectStore, StorageError, StorageResult, UploadOptions};

#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    public_base: Option<Url>,
    fail_list: AtomicBool,
    fail_download: AtomicBool,
    fail_upload: Mutex<Option<String>>,
    list_calls: AtomicUsize,
    download_calls: AtomicUsize,
    upload_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve public URLs under `base` (e.g. a mock HTTP backend).
    pub fn with_public_base(mut self, base: Url) -> Self {
        self.public_base = Some(base);
        self
    }

    /// Seed an object.
    pub fn insert(&self, key: &str, body: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), body.into());
    }

    /// Current bytes of an object.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Make `list` fail until reset.
    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make `download` fail until reset.
    pub fn fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    /// Make `upload` fail with `message` until reset with `None`.
    pub fn fail_upload(&self, message: Option<&str>) {
        *self.fail_upload.lock().unwrap_or_else(PoisonError::into_inner) =
            message.map(str::to_string);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, search: &str) -> StorageResult<Vec<ObjectInfo>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("listing disabled".to_string()));
        }
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = objects
            .keys()
            .filter(|name| name.contains(search))
            .map(|name| ObjectInfo { name: name.clone() })
            .collect();
        names.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(names)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("download disabled".to_string()));
        }
        self.get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn public_url(&self, key: &str) -> Option<Url> {
        self.public_base.as_ref().and_then(|base| base.join(key).ok())
    }

    async fn upload(&self, key: &str, body: Vec<u8>, options: UploadOptions) -> StorageResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self
            .fail_upload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(StorageError::Status {
                status: 500,
                message,
            });
        }

        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        if !options.upsert && objects.contains_key(key) {
            return Err(StorageError::Status {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        objects.insert(key.to_string(), body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_download() {
        let store = MemoryStore::new();
        store
            .upload("config.json", b"{}".to_vec(), UploadOptions::json_upsert())
            .await
            .unwrap();

        assert_eq!(store.download("config.json").await.unwrap(), b"{}");
        let listing = store.list("").await.unwrap();
        assert_eq!(listing, vec![ObjectInfo { name: "config.json".into() }]);
    }

    #[tokio::test]
    async fn test_list_search() {
        let store = MemoryStore::new();
        for i in 0..150 {
            store.insert(&format!("asset-{:03}.png", i), Vec::new());
        }
        store.insert("config.json", "{}");

        let listing = store.list("config.json").await.unwrap();
        assert_eq!(listing, vec![ObjectInfo { name: "config.json".into() }]);
        assert_eq!(store.list("").await.unwrap().len(), 151);
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = MemoryStore::new();
        let err = store.download("config.json").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upload_without_upsert_conflicts() {
        let store = MemoryStore::new();
        store.insert("config.json", "{}");
        let options = UploadOptions {
            upsert: false,
            content_type: "application/json",
        };
        let err = store.upload("config.json", b"[]".to_vec(), options).await.unwrap_err();
        assert!(matches!(err, StorageError::Status { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = MemoryStore::new();
        store.fail_list(true);
        store.fail_upload(Some("quota exceeded"));

        assert!(store.list("").await.is_err());
        let err = store
            .upload("config.json", Vec::new(), UploadOptions::json_upsert())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "quota exceeded");
        assert_eq!(store.list_calls(), 1);
        assert_eq!(store.upload_calls(), 1);
    }

    #[test]
    fn test_public_url() {
        let store = MemoryStore::new();
        assert!(store.public_url("config.json").is_none());

        let store = MemoryStore::new().with_public_base("http://127.0.0.1:9000/public/".parse().unwrap());
        assert_eq!(
            store.public_url("config.json").unwrap().as_str(),
            "http://127.0.0.1:9000/public/config.json"
        );
    }
}
