//! Key-binding synchronization coordinator.

use crate::config::SyncConfig;
use crate::editor::{unbound_action_names, EditorSurface};
use crate::error::{SyncError, SyncResult};
use crate::notify::BindingListener;
use crate::remote::RemoteConfigService;
use crate::session::{Baseline, SyncSession};
use confsync_core::{diff, ConfigDocument, Patch};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Lifecycle of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No editor installed yet.
    Uninitialized,
    /// Baseline captured, remote overrides not applied yet.
    BaselineCaptured,
    /// Steady state; bindings can be changed and persisted.
    Ready,
    /// A persist cycle is writing to the remote.
    Persisting,
}

impl CoordinatorState {
    /// Returns true once `install_on` has finished at least once.
    pub fn is_ready(&self) -> bool {
        matches!(self, CoordinatorState::Ready | CoordinatorState::Persisting)
    }
}

/// Statistics about synchronization.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Remote documents fetched and applied to an editor.
    pub documents_applied: u64,
    /// Individual bindings applied from remote documents.
    pub bindings_applied: u64,
    /// Persist cycles that reached the remote.
    pub persist_cycles: u64,
    /// Remote fetches or stores that failed.
    pub remote_failures: u64,
    /// Time of the last successful persist.
    pub last_persist_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Keeps editors' key bindings in step with a remote override document.
///
/// The remote document only ever holds the difference between the
/// session baseline and the user's current bindings. It is replaced
/// wholesale on each persist; patches never accumulate.
///
/// The first editor installed is the primary one: persist cycles read the
/// current bindings from it. Binding changes are applied to every editor.
pub struct BindingSyncCoordinator<R: RemoteConfigService> {
    config: SyncConfig,
    session: Arc<SyncSession>,
    remote: Arc<R>,
    editors: RwLock<Vec<Arc<dyn EditorSurface>>>,
    listeners: RwLock<Vec<Arc<dyn BindingListener>>>,
    state: RwLock<CoordinatorState>,
    stats: RwLock<SyncStats>,
}

impl<R: RemoteConfigService> BindingSyncCoordinator<R> {
    /// Creates a coordinator with its own session.
    pub fn new(config: SyncConfig, remote: Arc<R>) -> Self {
        Self::with_session(config, Arc::new(SyncSession::new()), remote)
    }

    /// Creates a coordinator sharing `session` with others.
    pub fn with_session(config: SyncConfig, session: Arc<SyncSession>, remote: Arc<R>) -> Self {
        Self {
            config,
            session,
            remote,
            editors: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
            state: RwLock::new(CoordinatorState::Uninitialized),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> CoordinatorState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Gets the session.
    pub fn session(&self) -> &Arc<SyncSession> {
        &self.session
    }

    /// Gets the session baseline, if captured.
    pub fn baseline(&self) -> Option<Arc<Baseline>> {
        self.session.baseline()
    }

    /// Name of the remote document this coordinator reads and writes.
    pub fn config_name(&self) -> String {
        self.config.config_name()
    }

    /// Registers a listener for binding changes.
    pub fn add_listener(&self, listener: Arc<dyn BindingListener>) {
        self.listeners.write().push(listener);
    }

    /// Number of registered editors.
    pub fn editor_count(&self) -> usize {
        self.editors.read().len()
    }

    /// Current bindings of the primary editor.
    pub fn current_bindings(&self) -> Option<ConfigDocument> {
        self.primary_editor().map(|editor| editor.live_bindings())
    }

    /// Actions the primary editor currently has no keystroke for.
    pub fn unbound_action_names(&self) -> Vec<String> {
        self.primary_editor()
            .map(|editor| unbound_action_names(editor.as_ref()))
            .unwrap_or_default()
    }

    /// Registers `editor` and applies the user's remote overrides to it.
    ///
    /// The first call in the session captures the baseline from `editor`
    /// before anything is changed. A failed fetch is logged and returned,
    /// but the editor stays registered with its defaults and the
    /// coordinator still becomes ready.
    ///
    /// Returns the number of bindings applied.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RemoteFetchFailed`] if the overrides could not be read.
    pub async fn install_on(&self, editor: Arc<dyn EditorSurface>) -> SyncResult<usize> {
        {
            let mut editors = self.editors.write();
            if !editors.iter().any(|e| Arc::ptr_eq(e, &editor)) {
                editors.push(Arc::clone(&editor));
            }
        }

        let (baseline, captured) = self.session.capture_baseline(editor.as_ref());
        if captured {
            info!(
                bindings = baseline.bindings().len(),
                unbound_actions = baseline.unbound_actions().len(),
                "captured default keybindings"
            );
            debug!(defaults = ?baseline.bindings(), unbound = ?baseline.unbound_actions(), "default keybindings");
        }
        if self.state() == CoordinatorState::Uninitialized {
            self.set_state(CoordinatorState::BaselineCaptured);
        }

        let name = self.config.config_name();
        let fetched = self.remote.fetch(&name).await;
        self.set_state(CoordinatorState::Ready);

        match fetched {
            Ok(document) => {
                info!(config = %name, bindings = document.len(), "retrieved keybinding config");
                for (keystroke, action) in document.iter() {
                    editor.bind(keystroke, action);
                }

                let mut stats = self.stats.write();
                stats.documents_applied += 1;
                stats.bindings_applied += document.len() as u64;
                Ok(document.len())
            }
            Err(e) => {
                error!(config = %name, error = %e, "failed to retrieve keybinding config, keeping defaults");
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    /// Removes `editor`. If it was the primary, the next editor takes over.
    ///
    /// Returns true if the editor was registered.
    pub fn detach_editor(&self, editor: &Arc<dyn EditorSurface>) -> bool {
        let mut editors = self.editors.write();
        let before = editors.len();
        editors.retain(|e| !Arc::ptr_eq(e, editor));
        editors.len() != before
    }

    /// Binds `keystroke` to `action` (or unbinds it) and persists the result.
    ///
    /// The change is applied to every registered editor, then listeners
    /// are notified, then a persist cycle runs. Callers that need to know
    /// the change reached the remote must await the returned future.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoEditor`] if no editor is registered, or any
    /// error from [`Self::persist`]. The editors keep the new binding even
    /// if persisting fails.
    pub async fn set_binding(&self, keystroke: &str, action: Option<&str>) -> SyncResult<Patch> {
        let editors = self.editors.read().clone();
        if editors.is_empty() {
            return Err(SyncError::NoEditor);
        }

        for editor in &editors {
            editor.bind(keystroke, action);
        }

        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener.bindings_changed(keystroke, action);
        }

        self.persist().await
    }

    /// Stores the difference between the baseline and the primary editor's
    /// current bindings as the new remote document.
    ///
    /// Returns the patch that was stored.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotInstalled`] before the first `install_on`,
    /// [`SyncError::NoEditor`] if every editor was detached, or
    /// [`SyncError::RemoteStoreFailed`] if the write failed.
    pub async fn persist(&self) -> SyncResult<Patch> {
        let baseline = self.session.baseline().ok_or(SyncError::NotInstalled)?;
        let current = self.current_bindings().ok_or(SyncError::NoEditor)?;

        let patch = diff(baseline.bindings(), &current);
        let name = self.config.config_name();
        debug!(config = %name, patch = ?patch, "persisting keybindings");

        self.set_state(CoordinatorState::Persisting);
        let stored = self.remote.store(&name, &patch).await;
        self.set_state(CoordinatorState::Ready);

        match stored {
            Ok(()) => {
                info!(config = %name, overrides = patch.len(), "persisted keybindings");
                let mut stats = self.stats.write();
                stats.persist_cycles += 1;
                stats.last_persist_time = Some(Instant::now());
                stats.last_error = None;
                Ok(patch)
            }
            Err(e) => {
                error!(config = %name, error = %e, "failed to persist keybindings");
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn primary_editor(&self) -> Option<Arc<dyn EditorSurface>> {
        self.editors.read().first().cloned()
    }

    fn set_state(&self, state: CoordinatorState) {
        *self.state.write() = state;
    }

    fn handle_error(&self, error: &SyncError) {
        let mut stats = self.stats.write();
        if error.is_remote() {
            stats.remote_failures += 1;
        }
        stats.last_error = Some(error.to_string());
    }
}
