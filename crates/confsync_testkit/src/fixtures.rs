//! Test fixtures for stores, editors and remotes.
//!
//! Provides convenience functions for setting up the common test scenarios.

use confsync_engine::{
    BindingListener, BindingSyncCoordinator, DirRemoteConfig, MemoryEditor, MemoryRemoteConfig,
    Platform, SyncConfig, SyncSession,
};
use confsync_storage::{EvictingStore, InMemoryMedium, ManualClock, StoreConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// A fixed "now" used by clock-driven fixtures (2023-11-14T22:13:20Z).
pub const FIXED_NOW: u64 = 1_700_000_000_000;

/// Default bindings of the fixture editor.
pub const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("ctrl+s", "save"),
    ("ctrl+z", "undo"),
    ("ctrl+y", "redo"),
    ("ctrl+d", "deleteLine"),
    ("ctrl+/", "toggleComment"),
    ("ctrl+f", "find"),
];

/// Actions of the fixture editor that have no default keystroke.
pub const DEFAULT_UNBOUND: &[&str] = &["gotoLine", "duplicateLine", "sortLines"];

/// Creates an editor with the fixture defaults.
pub fn default_editor() -> Arc<MemoryEditor> {
    Arc::new(MemoryEditor::with_defaults(
        DEFAULT_BINDINGS.iter().copied(),
        DEFAULT_UNBOUND.iter().copied(),
    ))
}

/// The Linux sync configuration, so names do not depend on the host.
pub fn linux_config() -> SyncConfig {
    SyncConfig::new().with_platform(Platform::Linux)
}

/// A store over an in-memory medium with a manual clock at [`FIXED_NOW`].
pub struct TestStore {
    /// The store.
    pub store: EvictingStore<InMemoryMedium, ManualClock>,
    /// Handle on the store's clock.
    pub clock: ManualClock,
}

impl TestStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::with_medium(InMemoryMedium::new())
    }

    /// Creates a store that refuses writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self::with_medium(InMemoryMedium::with_quota(quota))
    }

    /// Creates a store over `medium`.
    pub fn with_medium(medium: InMemoryMedium) -> Self {
        let clock = ManualClock::new(FIXED_NOW);
        let store = EvictingStore::with_clock(medium, StoreConfig::default(), clock.clone());
        Self { store, clock }
    }

    /// Seeds `key` with a timestamp `age` in the past, bypassing the quota.
    pub fn seed_aged(&mut self, key: &str, value: &str, age: Duration) {
        let ts = FIXED_NOW.saturating_sub(age.as_millis() as u64);
        let suffix = self.store.config().timestamp_suffix.clone();
        let medium = self.store.medium_mut();
        medium.insert_unchecked(key, value);
        medium.insert_unchecked(&format!("{key}{suffix}"), &ts.to_string());
    }

    /// Seeds an entry without a timestamp companion, bypassing the quota.
    pub fn seed_untimestamped(&mut self, key: &str, value: &str) {
        self.store.medium_mut().insert_unchecked(key, value);
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A listener that records every change it is told about.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingListener {
    /// Creates a listener with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(keystroke, action)` pairs in order.
    pub fn events(&self) -> Vec<(String, Option<String>)> {
        self.events.lock().clone()
    }
}

impl BindingListener for RecordingListener {
    fn bindings_changed(&self, keystroke: &str, action: Option<&str>) {
        self.events
            .lock()
            .push((keystroke.to_string(), action.map(str::to_string)));
    }
}

/// A coordinator over an in-memory remote, with handles on everything.
pub struct TestSync {
    /// The coordinator.
    pub coordinator: BindingSyncCoordinator<MemoryRemoteConfig>,
    /// The remote it reads and writes.
    pub remote: Arc<MemoryRemoteConfig>,
    /// A listener registered on the coordinator.
    pub listener: Arc<RecordingListener>,
}

impl TestSync {
    /// Creates a coordinator with its own session and an empty remote.
    pub fn new() -> Self {
        Self::with_remote(Arc::new(MemoryRemoteConfig::new()), Arc::new(SyncSession::new()))
    }

    /// Creates a coordinator over `remote` in `session`.
    pub fn with_remote(remote: Arc<MemoryRemoteConfig>, session: Arc<SyncSession>) -> Self {
        let coordinator = BindingSyncCoordinator::with_session(linux_config(), session, remote.clone());
        let listener = Arc::new(RecordingListener::new());
        coordinator.add_listener(listener.clone());
        Self {
            coordinator,
            remote,
            listener,
        }
    }
}

impl Default for TestSync {
    fn default() -> Self {
        Self::new()
    }
}

/// A directory remote in a temporary directory.
pub struct TestRemoteDir {
    /// The remote.
    pub remote: Arc<DirRemoteConfig>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestRemoteDir {
    /// Creates an empty remote directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            remote: Arc::new(DirRemoteConfig::new(temp_dir.path())),
            _temp_dir: temp_dir,
        }
    }

    /// Creates a coordinator for a fresh session over this directory.
    pub fn coordinator(&self) -> BindingSyncCoordinator<DirRemoteConfig> {
        BindingSyncCoordinator::new(linux_config(), self.remote.clone())
    }
}

impl Default for TestRemoteDir {
    fn default() -> Self {
        Self::new()
    }
}
