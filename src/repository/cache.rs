//! Last-known configuration document.
//!
//! Gives synchronous readers (the cookie policy, the public `/config`
//! endpoint) a document without an async fetch.
//!
//! Staleness contract: the value changes only after a successful
//! `ConfigRepository::load()` or `ConfigRepository::save()`, or an explicit
//! `set`/`clear`. It may lag behind the bucket when another writer saves.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::site::SiteConfig;

#[derive(Debug, Default)]
pub struct ConfigCache {
    inner: ArcSwapOption<SiteConfig>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<SiteConfig>> {
        self.inner.load_full()
    }

    pub fn set(&self, config: SiteConfig) {
        self.inner.store(Some(Arc::new(config)));
    }

    pub fn clear(&self) {
        self.inner.store(None);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_none()
    }

    /// Revision of the cached document, if any.
    pub fn revision(&self) -> Option<u64> {
        self.inner.load_full().map(|c| c.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::default_config;

    #[test]
    fn test_cache_operations() {
        let cache = ConfigCache::new();
        assert!(cache.is_empty());
        assert!(cache.get().is_none());

        let mut config = default_config();
        config.revision = 7;
        cache.set(config);
        assert_eq!(cache.revision(), Some(7));
        assert_eq!(cache.get().unwrap().site.name, "Supabase Auth");

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_readers_keep_old_snapshot() {
        let cache = ConfigCache::new();
        cache.set(default_config());
        let held = cache.get().unwrap();

        let mut next = default_config();
        next.revision = 2;
        cache.set(next);

        assert_eq!(held.revision, 1);
        assert_eq!(cache.revision(), Some(2));
    }
}
