//! File-based store medium for persistent storage.

use crate::backend::StoreMedium;
use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryMedium;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A store medium persisted as a single JSON object on disk.
///
/// The whole map is held in memory and rewritten after every mutation,
/// which is fine for the tens-to-hundreds of entries a cache holds.
/// Writes go to a sibling `.tmp` file first and are renamed into place.
///
/// # Example
///
/// ```no_run
/// use confsync_storage::{FileMedium, StoreMedium};
/// use std::path::Path;
///
/// let mut medium = FileMedium::open(Path::new("cache.json"), Some(5 * 1024 * 1024)).unwrap();
/// medium.set("templates", "{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    entries: InMemoryMedium,
}

impl FileMedium {
    /// Opens or creates a file medium at `path` with an optional byte quota.
    ///
    /// A missing file starts out empty; it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: &Path, quota: Option<usize>) -> StoreResult<Self> {
        let mut entries = match fs::read(path) {
            Ok(bytes) if bytes.is_empty() => InMemoryMedium::new(),
            Ok(bytes) => {
                let map: BTreeMap<String, String> = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Corrupted(format!("{}: {e}", path.display())))?;
                InMemoryMedium::with_entries(map)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => InMemoryMedium::new(),
            Err(e) => return Err(e.into()),
        };
        entries.set_quota(quota);

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Opens a file medium, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be read.
    pub fn open_with_create_dirs(path: &Path, quota: Option<usize>) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path, quota)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries.entries())
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StoreMedium for FileMedium {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let previous = self.entries.get(key);
        self.entries.set(key, value)?;

        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => self.entries.insert_unchecked(key, &old),
                None => self.entries.remove(key)?,
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let Some(previous) = self.entries.get(key) else {
            return Ok(());
        };
        self.entries.remove(key)?;

        if let Err(e) = self.persist() {
            self.entries.insert_unchecked(key, &previous);
            return Err(e);
        }
        Ok(())
    }

    fn key(&self, index: usize) -> Option<String> {
        self.entries.key(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_open_missing_is_empty() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::open(&dir.path().join("store.json"), None).unwrap();
        assert!(medium.is_empty());
    }

    #[test]
    fn file_persistence_across_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut medium = FileMedium::open(&path, None).unwrap();
            medium.set("k1", "v1").unwrap();
            medium.set("k2", "v2").unwrap();
            medium.remove("k1").unwrap();
        }

        let medium = FileMedium::open(&path, None).unwrap();
        assert_eq!(medium.len(), 1);
        assert_eq!(medium.get("k2").as_deref(), Some("v2"));
        assert_eq!(medium.get("k1"), None);
    }

    #[test]
    fn file_quota_is_enforced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut medium = FileMedium::open(&path, Some(6)).unwrap();
        medium.set("a", "12345").unwrap();
        let result = medium.set("b", "1");
        assert!(matches!(result, Err(StoreError::CapacityExceeded { .. })));

        let reopened = FileMedium::open(&path, None).unwrap();
        assert_eq!(reopened.get("b"), None);
    }

    #[test]
    fn file_corrupted_contents_fail_to_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"[1, 2, 3]").unwrap();

        let result = FileMedium::open(&path, None);
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn file_failed_persist_keeps_memory_in_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut medium = FileMedium::open(&path, None).unwrap();
        medium.set("k", "v").unwrap();

        // A directory in place of the temp file makes every persist fail.
        fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(matches!(medium.remove("k"), Err(StoreError::Io(_))));
        assert_eq!(medium.get("k").as_deref(), Some("v"));

        assert!(medium.set("k", "changed").is_err());
        assert_eq!(medium.get("k").as_deref(), Some("v"));

        let reopened = FileMedium::open(&path, None).unwrap();
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn file_open_with_create_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let mut medium = FileMedium::open_with_create_dirs(&path, None).unwrap();
        medium.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
