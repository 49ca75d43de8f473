//! Admin session state.
//!
//! Single source of truth for "the configuration as currently being edited".
//! The state lock is held only for synchronous reads and the merge; it is
//! never held across a storage call.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

use crate::editor::EditableSection;
use crate::repository::{ConfigError, ConfigRepository};
use crate::site::{ConfigPatch, Merge, SiteConfig};

/// How long the save-success flag stays raised after a save.
pub const SAVE_SUCCESS_WINDOW: Duration = Duration::from_secs(3);

/// Where the session stands after its last (re)load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Not started yet.
    Loading,
    /// No document in the bucket (or the listing failed): show the initializer.
    NeedsInitialization,
    /// The document is listed but could not be loaded.
    Unavailable,
    Ready,
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The caller is not an admin.
    #[error("admin privileges required")]
    ReadOnly,

    /// No document is loaded to merge into.
    #[error("configuration is not loaded")]
    NotLoaded,

    /// A document already exists; initializing would overwrite it.
    #[error("configuration already exists")]
    AlreadyInitialized,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Point-in-time view of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub config: Option<SiteConfig>,
    pub is_admin: bool,
    pub is_loading: bool,
    pub save_success: bool,
    /// The displayed document differs from what was last persisted.
    pub unsaved: bool,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    config: Option<SiteConfig>,
    loading: bool,
    unsaved: bool,
    last_error: Option<String>,
}

pub struct AdminSession {
    repository: Arc<ConfigRepository>,
    is_admin: bool,
    state: Mutex<SessionState>,
    save_success: Arc<AtomicBool>,
    saves_in_flight: AtomicUsize,
}

impl AdminSession {
    /// Create a session without touching storage.
    pub fn new(repository: Arc<ConfigRepository>, is_admin: bool) -> Self {
        Self {
            repository,
            is_admin,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Loading,
                config: None,
                loading: false,
                unsaved: false,
                last_error: None,
            }),
            save_success: Arc::new(AtomicBool::new(false)),
            saves_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a session and load the document.
    pub async fn start(repository: Arc<ConfigRepository>, is_admin: bool) -> Self {
        let session = Self::new(repository, is_admin);
        session.refresh().await;
        session
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-run the existence check and load.
    ///
    /// `load()` is skipped entirely when the document is not listed.
    pub async fn refresh(&self) -> SessionPhase {
        self.state().loading = true;

        let (phase, config) = if !self.repository.exists().await {
            (SessionPhase::NeedsInitialization, None)
        } else {
            match self.repository.load().await {
                Some(config) => (SessionPhase::Ready, Some(config)),
                None => (SessionPhase::Unavailable, None),
            }
        };

        let mut state = self.state();
        state.loading = false;
        state.phase = phase;
        state.config = config;
        state.unsaved = false;
        tracing::info!(
            phase = ?phase,
            revision = state.config.as_ref().map(|c| c.revision),
            is_admin = self.is_admin,
            "Admin session loaded"
        );
        phase
    }

    /// Write the default document, then reload.
    ///
    /// Only allowed while the session needs initialization and the document
    /// is still absent from the listing.
    pub async fn initialize(&self) -> SessionResult<SessionPhase> {
        if !self.is_admin {
            return Err(SessionError::ReadOnly);
        }
        if self.phase() != SessionPhase::NeedsInitialization {
            return Err(SessionError::AlreadyInitialized);
        }
        if self.repository.exists().await {
            tracing::warn!("Config appeared since the session loaded, refusing to initialize");
            self.refresh().await;
            return Err(SessionError::AlreadyInitialized);
        }
        self.state().loading = true;
        let result = self.repository.initialize().await;
        if let Err(e) = result {
            let mut state = self.state();
            state.loading = false;
            state.last_error = Some(e.to_string());
            return Err(e.into());
        }
        self.state().last_error = None;
        Ok(self.refresh().await)
    }

    /// Merge `patch` into the document and persist the result.
    ///
    /// The merged document is visible to readers before the save completes
    /// and stays in place when the save fails.
    pub async fn update_config(&self, patch: ConfigPatch) -> SessionResult<SiteConfig> {
        if !self.is_admin {
            return Err(SessionError::ReadOnly);
        }

        let sections = patch.sections();
        let merged = {
            let mut state = self.state();
            let config = state.config.as_mut().ok_or(SessionError::NotLoaded)?;
            config.merge(patch);
            config.revision += 1;
            state.unsaved = true;
            state.config.clone().ok_or(SessionError::NotLoaded)?
        };
        tracing::debug!(?sections, revision = merged.revision, "Config updated in session");

        self.saves_in_flight.fetch_add(1, Ordering::SeqCst);
        let result = self.repository.save(&merged).await;
        self.saves_in_flight.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(()) => {
                {
                    let mut state = self.state();
                    state.unsaved = false;
                    state.last_error = None;
                }
                self.flash_save_success();
                Ok(merged)
            }
            Err(e) => {
                self.state().last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Merge one editor section and persist.
    pub async fn save_section<S: EditableSection>(&self, section: S) -> SessionResult<SiteConfig> {
        self.update_config(section.into_patch().into()).await
    }

    fn flash_save_success(&self) {
        self.save_success.store(true, Ordering::SeqCst);
        let flag = self.save_success.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SAVE_SUCCESS_WINDOW).await;
            flag.store(false, Ordering::SeqCst);
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            phase: state.phase,
            config: state.config.clone(),
            is_admin: self.is_admin,
            is_loading: state.loading || self.saves_in_flight.load(Ordering::SeqCst) > 0,
            save_success: self.save_success.load(Ordering::SeqCst),
            unsaved: state.unsaved,
            last_error: state.last_error.clone(),
        }
    }

    pub fn config(&self) -> Option<SiteConfig> {
        self.state().config.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn save_success(&self) -> bool {
        self.save_success.load(Ordering::SeqCst)
    }

    pub fn repository(&self) -> &Arc<ConfigRepository> {
        &self.repository
    }
}
