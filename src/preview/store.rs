//! Isolated preview document.

use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

use crate::observability::metrics;
use crate::site::{Section, SectionPatch, SiteConfig};

/// Whether the store holds a document yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Empty,
    Active,
}

/// Draft document shown by the preview renderer.
///
/// Clones share the same document. Subscribers see the whole document on
/// every effective change. There is no way back to `Empty`; drop every
/// handle to discard the preview.
#[derive(Debug, Clone)]
pub struct PreviewStore {
    tx: Arc<watch::Sender<Option<Arc<SiteConfig>>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Store seeded with `config`.
    pub fn seeded(config: SiteConfig) -> Self {
        let store = Self::new();
        store.set_preview_config(config);
        store
    }

    /// Replace the preview document wholesale.
    pub fn set_preview_config(&self, config: SiteConfig) {
        tracing::debug!(revision = config.revision, "Preview document replaced");
        self.tx.send_replace(Some(Arc::new(config)));
    }

    /// Merge a section patch into the preview document.
    ///
    /// Returns false (and notifies nobody) when the store is empty or the
    /// merge leaves the document as it was.
    pub fn update_section(&self, patch: SectionPatch) -> bool {
        let section = patch.section();
        let updated = self.tx.send_if_modified(|current| match current {
            Some(config) => {
                let mut merged = (**config).clone();
                merged.apply_section(patch);
                if merged == **config {
                    return false;
                }
                *config = Arc::new(merged);
                true
            }
            None => false,
        });
        if updated {
            metrics::record_preview_update(section.as_str());
            tracing::trace!(section = %section, "Preview section updated");
        }
        updated
    }

    /// String-keyed variant of [`update_section`](Self::update_section).
    ///
    /// A key that is not an object-valued section, a payload that is not an
    /// object, or a payload that does not fit the section is ignored.
    pub fn update_section_raw(&self, key: &str, value: Value) -> bool {
        let Ok(section) = Section::from_str(key) else {
            tracing::debug!(key = %key, "Ignoring preview update for non-section key");
            return false;
        };
        if !value.is_object() {
            tracing::debug!(key = %key, "Ignoring non-object preview payload");
            return false;
        }
        match SectionPatch::from_json(section, value) {
            Ok(patch) => self.update_section(patch),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Ignoring malformed preview payload");
                false
            }
        }
    }

    pub fn current(&self) -> Option<Arc<SiteConfig>> {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> PreviewState {
        if self.tx.borrow().is_some() {
            PreviewState::Active
        } else {
            PreviewState::Empty
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == PreviewState::Active
    }

    /// Observe the preview document.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SiteConfig>>> {
        self.tx.subscribe()
    }
}

impl Default for PreviewStore {
    fn default() -> Self {
        Self::new()
    }
}
