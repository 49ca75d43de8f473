//! Section editors.
//!
//! # Data Flow
//! ```text
//! SiteConfig section (initial data)
//!     → SectionEditor<S> (local draft)
//!     → edit(): draft change ──(Theme, Branding)──→ PreviewStore::update_section
//!     → submit(): validate → unchanged? → on_save(draft)
//!                                          → AdminSession::update_config
//! ```
//!
//! # Design Decisions
//! - One generic editor; the section type supplies validation, its preview
//!   behavior and its patch conversion through [`EditableSection`]
//! - Editors never touch storage; the save callback owns persistence
//! - Non-admin editors are read-only: every mutation is rejected

pub mod sections;
pub mod validation;

use std::future::Future;
use thiserror::Error;

use crate::preview::PreviewStore;
use crate::session::{SessionError, SessionResult};
use crate::site::{Section, SectionPatch, SiteConfig};

pub use validation::{FieldError, ValidationErrors};

/// A document section that can be edited as one form.
pub trait EditableSection: Clone + PartialEq + Send + Sync + 'static {
    const SECTION: Section;

    /// Mirror draft changes into the preview document.
    const LIVE_PREVIEW: bool;

    fn from_config(config: &SiteConfig) -> Self;

    /// Every field failure of the current value.
    fn validate(&self) -> Vec<FieldError>;

    /// Patch naming every key of the section.
    fn into_patch(self) -> SectionPatch;
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor is read-only")]
    ReadOnly,

    #[error("a save is already in progress")]
    Busy,

    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Save(#[from] SessionError),
}

/// Result of a submit that passed the gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft equals the initial data; nothing was saved.
    Unchanged,
    Saved(SiteConfig),
}

/// Draft state for one section.
#[derive(Debug, Clone)]
pub struct SectionEditor<S: EditableSection> {
    initial: S,
    draft: S,
    is_admin: bool,
    is_loading: bool,
    preview: Option<PreviewStore>,
}

impl<S: EditableSection> SectionEditor<S> {
    pub fn new(initial: S, is_admin: bool) -> Self {
        Self {
            draft: initial.clone(),
            initial,
            is_admin,
            is_loading: false,
            preview: None,
        }
    }

    pub fn from_config(config: &SiteConfig, is_admin: bool) -> Self {
        Self::new(S::from_config(config), is_admin)
    }

    /// Attach the preview store. Only live-preview sections write to it.
    pub fn with_preview(mut self, preview: PreviewStore) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Mirror the session's loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn draft(&self) -> &S {
        &self.draft
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.initial
    }

    pub fn is_read_only(&self) -> bool {
        !self.is_admin
    }

    pub fn validate(&self) -> ValidationErrors {
        ValidationErrors(self.draft.validate())
    }

    /// Mutate the draft.
    pub fn edit<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut S),
    {
        if !self.is_admin {
            return Err(EditorError::ReadOnly);
        }
        f(&mut self.draft);
        self.mirror();
        Ok(())
    }

    /// Throw the draft away and start over from the initial data.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.mirror();
    }

    /// Re-seed from a newer document (e.g. after another section saved).
    pub fn rebase(&mut self, config: &SiteConfig) {
        self.initial = S::from_config(config);
        self.draft = self.initial.clone();
    }

    fn mirror(&self) {
        if !S::LIVE_PREVIEW {
            return;
        }
        if let Some(preview) = &self.preview {
            preview.update_section(self.draft.clone().into_patch());
        }
    }

    /// Validate and hand the draft to `on_save`.
    ///
    /// On success the draft becomes the new initial data.
    pub async fn submit<F, Fut>(&mut self, on_save: F) -> Result<SubmitOutcome, EditorError>
    where
        F: FnOnce(S) -> Fut,
        Fut: Future<Output = SessionResult<SiteConfig>>,
    {
        if !self.is_admin {
            return Err(EditorError::ReadOnly);
        }
        if self.is_loading {
            return Err(EditorError::Busy);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            tracing::debug!(section = %S::SECTION, errors = errors.len(), "Section draft rejected");
            return Err(EditorError::Invalid(errors));
        }
        if !self.is_dirty() {
            return Ok(SubmitOutcome::Unchanged);
        }

        self.is_loading = true;
        let result = on_save(self.draft.clone()).await;
        self.is_loading = false;

        let config = result?;
        self.initial = self.draft.clone();
        tracing::debug!(section = %S::SECTION, revision = config.revision, "Section saved");
        Ok(SubmitOutcome::Saved(config))
    }
}
