//! Cache command implementation.

use confsync_storage::{EvictingStore, FileMedium, PurgeReport, StoreMedium, WriteOutcome};
use std::path::Path;
use std::time::Duration;

/// What to do with the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// Print one value.
    Get {
        /// Key to read.
        key: String,
    },
    /// Store one value.
    Put {
        /// Key to write.
        key: String,
        /// Value to write.
        value: String,
        /// Also write a timestamp companion, making the entry evictable.
        stamp: bool,
    },
    /// Remove entries older than an age.
    Purge {
        /// Age in seconds; takes precedence over `level`.
        max_age_secs: Option<u64>,
        /// Depth in the eviction ladder, 0 being the most lenient.
        level: Option<usize>,
    },
    /// Print the serialized size.
    Size,
    /// List every key.
    Keys,
}

/// Opens the cache file at `path`, creating parent directories.
pub fn open(path: &Path, quota: Option<usize>) -> Result<EvictingStore<FileMedium>, Box<dyn std::error::Error>> {
    Ok(EvictingStore::new(FileMedium::open_with_create_dirs(path, quota)?))
}

/// Runs the cache command.
pub fn run(path: &Path, quota: Option<usize>, action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open(path, quota)?;

    match action {
        CacheAction::Get { key } => match store.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("no entry for {key:?}").into()),
        },
        CacheAction::Put { key, value, stamp } => {
            let outcome = put(&mut store, &key, &value, stamp)?;
            match outcome {
                WriteOutcome::Stored { purges: 0 } => println!("Stored {key}"),
                WriteOutcome::Stored { purges } => {
                    println!("Stored {key} after {purges} purge sweep(s)")
                }
                WriteOutcome::Dropped => return Err(format!("cache full, {key} was dropped").into()),
            }
        }
        CacheAction::Purge {
            max_age_secs,
            level,
        } => {
            let report = purge(&mut store, max_age_secs, level)?;
            println!("Removed {} key(s)", report.len());
            for key in &report.removed {
                println!("  {key}");
            }
        }
        CacheAction::Size => {
            println!("{} keys, {} bytes", store.len(), store.size_in_bytes()?);
        }
        CacheAction::Keys => {
            for key in store.keys() {
                match store.timestamp_of(&key) {
                    Some(ts) => println!("{key}\t(stamped {ts})"),
                    None => println!("{key}"),
                }
            }
        }
    }

    Ok(())
}

/// Writes `value`, stamped or not.
pub fn put<M: StoreMedium>(
    store: &mut EvictingStore<M>,
    key: &str,
    value: &str,
    stamp: bool,
) -> Result<WriteOutcome, Box<dyn std::error::Error>> {
    let outcome = if stamp {
        store.write_entry(key, value)?
    } else {
        store.write_safely(key, value)?
    };
    Ok(outcome)
}

/// Purges by explicit age or by ladder level (level 0 when neither is given).
pub fn purge<M: StoreMedium>(
    store: &mut EvictingStore<M>,
    max_age_secs: Option<u64>,
    level: Option<usize>,
) -> Result<PurgeReport, Box<dyn std::error::Error>> {
    let max_age = match max_age_secs {
        Some(secs) => Duration::from_secs(secs),
        None => {
            let depth = level.unwrap_or(0);
            let ladder = &store.config().ladder;
            let threshold = ladder
                .at(depth)
                .ok_or_else(|| format!("ladder has {} levels, no level {depth}", ladder.len()))?;
            tracing::info!(label = %threshold.label, "purging with ladder threshold");
            threshold.max_age
        }
    };
    Ok(store.purge_stale(max_age)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsync_storage::InMemoryMedium;
    use tempfile::tempdir;

    #[test]
    fn put_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut store = open(&path, None).unwrap();
        assert!(put(&mut store, "plain", "1", false).unwrap().is_stored());
        assert!(put(&mut store, "stamped", "2", true).unwrap().is_stored());

        let store = open(&path, None).unwrap();
        assert_eq!(store.get("plain").as_deref(), Some("1"));
        assert!(store.timestamp_of("plain").is_none());
        assert!(store.timestamp_of("stamped").is_some());
    }

    #[test]
    fn purge_by_age_and_level() {
        let mut store = EvictingStore::new(InMemoryMedium::with_entries([
            ("old", "x"),
            ("old-ts", "1"),
            ("keep", "y"),
        ]));

        let report = purge(&mut store, None, Some(4)).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(store.keys(), ["keep"]);

        assert!(purge(&mut store, None, Some(9)).is_err());
        assert!(purge(&mut store, Some(0), None).unwrap().is_empty());
    }
}
