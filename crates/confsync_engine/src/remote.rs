//! Remote configuration service abstraction.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use confsync_core::ConfigDocument;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// The per-user remote store of named configuration documents.
///
/// This trait abstracts the service boundary, allowing different
/// implementations (HTTP config servlet, a directory of files, in-memory
/// for testing). Implementations report read failures as
/// [`SyncError::RemoteFetchFailed`] and write failures as
/// [`SyncError::RemoteStoreFailed`].
#[async_trait]
pub trait RemoteConfigService: Send + Sync {
    /// Fetches the document called `name`.
    ///
    /// A document that was never stored fetches as an empty document.
    async fn fetch(&self, name: &str) -> SyncResult<ConfigDocument>;

    /// Replaces the document called `name` with `document`.
    async fn store(&self, name: &str, document: &ConfigDocument) -> SyncResult<()>;
}

/// An in-memory remote service for testing.
///
/// Failures can be switched on per operation, and every successful store
/// is kept in a history.
#[derive(Debug, Default)]
pub struct MemoryRemoteConfig {
    documents: RwLock<HashMap<String, ConfigDocument>>,
    history: RwLock<Vec<(String, ConfigDocument)>>,
    fail_fetch: AtomicBool,
    fail_store: AtomicBool,
}

impl MemoryRemoteConfig {
    /// Creates an empty remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the document called `name`.
    pub fn with_document(self, name: impl Into<String>, document: ConfigDocument) -> Self {
        self.documents.write().insert(name.into(), document);
        self
    }

    /// Makes every fetch fail (or succeed again).
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Makes every store fail (or succeed again).
    pub fn set_fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    /// Returns the document called `name`, if one was stored.
    pub fn document(&self, name: &str) -> Option<ConfigDocument> {
        self.documents.read().get(name).cloned()
    }

    /// Returns every successful store in order.
    pub fn history(&self) -> Vec<(String, ConfigDocument)> {
        self.history.read().clone()
    }
}

#[async_trait]
impl RemoteConfigService for MemoryRemoteConfig {
    async fn fetch(&self, name: &str) -> SyncResult<ConfigDocument> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SyncError::fetch_failed(name, "remote unavailable"));
        }
        Ok(self.documents.read().get(name).cloned().unwrap_or_default())
    }

    async fn store(&self, name: &str, document: &ConfigDocument) -> SyncResult<()> {
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(SyncError::store_failed(name, "remote unavailable"));
        }
        self.documents
            .write()
            .insert(name.to_string(), document.clone());
        self.history
            .write()
            .push((name.to_string(), document.clone()));
        Ok(())
    }
}
