//! Integration tests for the coordinator against a directory-backed remote.

use async_trait::async_trait;
use confsync_core::ConfigDocument;
use confsync_engine::{
    BindingSyncCoordinator, DirRemoteConfig, EditorSurface, MemoryEditor, Platform,
    RemoteConfigService, SyncConfig, SyncError, SyncResult, SyncSession,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// A remote that forwards to a directory and can be taken offline.
struct FlakyRemote {
    inner: DirRemoteConfig,
    offline: AtomicBool,
    stores: AtomicUsize,
}

impl FlakyRemote {
    fn new(inner: DirRemoteConfig) -> Self {
        Self {
            inner,
            offline: AtomicBool::new(false),
            stores: AtomicUsize::new(0),
        }
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteConfigService for FlakyRemote {
    async fn fetch(&self, name: &str) -> SyncResult<ConfigDocument> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::fetch_failed(name, "offline"));
        }
        self.inner.fetch(name).await
    }

    async fn store(&self, name: &str, document: &ConfigDocument) -> SyncResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::store_failed(name, "offline"));
        }
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(name, document).await
    }
}

fn linux() -> SyncConfig {
    SyncConfig::new().with_platform(Platform::Linux)
}

fn fresh_editor() -> Arc<MemoryEditor> {
    Arc::new(MemoryEditor::with_defaults(
        [
            ("ctrl+s", "save"),
            ("ctrl+d", "deleteLine"),
            ("ctrl+/", "toggleComment"),
        ],
        ["gotoLine", "duplicateLine"],
    ))
}

#[tokio::test]
async fn overrides_survive_a_new_session() {
    let dir = tempdir().unwrap();

    // First session: the user customizes two bindings.
    {
        let remote = Arc::new(DirRemoteConfig::new(dir.path()));
        let coordinator = BindingSyncCoordinator::new(linux(), remote);
        coordinator.install_on(fresh_editor()).await.unwrap();

        coordinator
            .set_binding("ctrl+g", Some("gotoLine"))
            .await
            .unwrap();
        coordinator.set_binding("ctrl+d", None).await.unwrap();
    }

    // Second session: a fresh editor comes up with the same overrides.
    let remote = Arc::new(DirRemoteConfig::new(dir.path()));
    let coordinator = BindingSyncCoordinator::new(linux(), remote.clone());
    let editor = fresh_editor();
    let applied = coordinator.install_on(editor.clone()).await.unwrap();

    assert_eq!(applied, 2);
    let bindings = editor.live_bindings();
    assert_eq!(bindings.value("ctrl+g"), Some("gotoLine"));
    assert!(!bindings.contains_key("ctrl+d"));
    assert_eq!(bindings.value("ctrl+s"), Some("save"));

    let stored = remote.fetch("keymap-linux").await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.get("ctrl+d"), Some(None));
}

#[tokio::test]
async fn platforms_keep_separate_documents() {
    let dir = tempdir().unwrap();
    let remote = Arc::new(DirRemoteConfig::new(dir.path()));

    let linux_side = BindingSyncCoordinator::new(linux(), remote.clone());
    linux_side.install_on(fresh_editor()).await.unwrap();
    linux_side.set_binding("f5", Some("save")).await.unwrap();

    let mac_side = BindingSyncCoordinator::new(
        SyncConfig::new().with_platform(Platform::Mac),
        remote.clone(),
    );
    let mac_editor = fresh_editor();
    assert_eq!(mac_side.install_on(mac_editor.clone()).await.unwrap(), 0);
    assert!(!mac_editor.live_bindings().contains_key("f5"));

    assert!(remote.document_path("keymap-linux").exists());
    assert!(!remote.document_path("keymap-mac").exists());
}

#[tokio::test]
async fn shared_session_captures_baseline_once() {
    let dir = tempdir().unwrap();
    let remote = Arc::new(DirRemoteConfig::new(dir.path()));
    let session = Arc::new(SyncSession::new());

    let first = BindingSyncCoordinator::with_session(linux(), session.clone(), remote.clone());
    let first_editor = fresh_editor();
    first.install_on(first_editor.clone()).await.unwrap();
    first.set_binding("ctrl+s", Some("saveAll")).await.unwrap();

    // The second install applies the override; the baseline stays the defaults.
    let second = BindingSyncCoordinator::with_session(linux(), session.clone(), remote.clone());
    let second_editor = fresh_editor();
    second.install_on(second_editor.clone()).await.unwrap();

    let baseline = session.baseline().unwrap();
    assert_eq!(baseline.bindings().value("ctrl+s"), Some("save"));
    assert_eq!(baseline.unbound_actions(), ["gotoLine", "duplicateLine"]);

    let patch = second.persist().await.unwrap();
    assert_eq!(patch.len(), 1);
    assert_eq!(patch.value("ctrl+s"), Some("saveAll"));
}

#[tokio::test]
async fn offline_remote_keeps_defaults_then_recovers() {
    let dir = tempdir().unwrap();
    let remote = Arc::new(FlakyRemote::new(DirRemoteConfig::new(dir.path())));
    remote.set_offline(true);

    let coordinator = BindingSyncCoordinator::new(linux(), remote.clone());
    let editor = fresh_editor();
    let result = coordinator.install_on(editor.clone()).await;

    assert!(matches!(result, Err(SyncError::RemoteFetchFailed { .. })));
    assert_eq!(editor.live_bindings().len(), 3);

    let result = coordinator.set_binding("ctrl+e", Some("duplicateLine")).await;
    assert!(matches!(result, Err(SyncError::RemoteStoreFailed { .. })));
    assert_eq!(remote.stores.load(Ordering::SeqCst), 0);

    remote.set_offline(false);
    let patch = coordinator.persist().await.unwrap();
    assert_eq!(patch.value("ctrl+e"), Some("duplicateLine"));

    let stats = coordinator.stats();
    assert_eq!(stats.remote_failures, 2);
    assert_eq!(stats.persist_cycles, 1);
    assert!(stats.last_error.is_none());
}

#[tokio::test]
async fn all_editors_follow_a_change() {
    let dir = tempdir().unwrap();
    let remote = Arc::new(DirRemoteConfig::new(dir.path()));
    let coordinator = BindingSyncCoordinator::new(linux(), remote);

    let editors: Vec<Arc<MemoryEditor>> = (0..3).map(|_| fresh_editor()).collect();
    for editor in &editors {
        coordinator.install_on(editor.clone()).await.unwrap();
    }

    coordinator
        .set_binding("ctrl+shift+d", Some("duplicateLine"))
        .await
        .unwrap();

    for editor in &editors {
        assert_eq!(
            editor.live_bindings().value("ctrl+shift+d"),
            Some("duplicateLine")
        );
    }
    assert_eq!(coordinator.unbound_action_names(), ["gotoLine"]);
}
