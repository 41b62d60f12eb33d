//! Directory-backed remote configuration service.

use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteConfigService;
use async_trait::async_trait;
use confsync_core::ConfigDocument;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores each named document as `<root>/<name>.json`.
///
/// This is the layout of a user's config directory on the machine that
/// serves the editor. A missing file fetches as an empty document. Writes
/// go through a temporary file and a rename so a reader never sees a
/// half-written document.
#[derive(Debug, Clone)]
pub struct DirRemoteConfig {
    root: PathBuf,
}

impl DirRemoteConfig {
    /// Creates a service rooted at `root`. The directory is created on first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file holding the document called `name`.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl RemoteConfigService for DirRemoteConfig {
    async fn fetch(&self, name: &str) -> SyncResult<ConfigDocument> {
        let path = self.document_path(name);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigDocument::new()),
            Err(e) => return Err(SyncError::fetch_failed(name, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ConfigDocument::new());
        }
        ConfigDocument::from_json(&bytes).map_err(|e| SyncError::fetch_failed(name, e))
    }

    async fn store(&self, name: &str, document: &ConfigDocument) -> SyncResult<()> {
        let json = document
            .to_json_pretty()
            .map_err(|e| SyncError::store_failed(name, e))?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SyncError::store_failed(name, e))?;

        let path = self.document_path(name);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| SyncError::store_failed(name, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| SyncError::store_failed(name, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn dir_remote_roundtrip() {
        let dir = tempdir().unwrap();
        let remote = DirRemoteConfig::new(dir.path().join("rc"));

        let mut doc = ConfigDocument::new();
        doc.set("ctrl+shift+f", "format");
        doc.set_null("ctrl+d");
        remote.store("keymap-linux", &doc).await.unwrap();

        assert!(remote.document_path("keymap-linux").exists());
        assert_eq!(remote.fetch("keymap-linux").await.unwrap(), doc);
    }

    #[tokio::test]
    async fn dir_remote_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let remote = DirRemoteConfig::new(dir.path());
        assert!(remote.fetch("keymap-windows").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dir_remote_malformed_file_fails_fetch() {
        let dir = tempdir().unwrap();
        let remote = DirRemoteConfig::new(dir.path());
        std::fs::write(remote.document_path("keymap-mac"), b"{\"a\": [1]}").unwrap();

        let result = remote.fetch("keymap-mac").await;
        assert!(matches!(result, Err(SyncError::RemoteFetchFailed { .. })));
    }
}
