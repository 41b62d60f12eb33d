//! Template catalog sources.

use crate::error::{AssistError, AssistResult};
use crate::template::TemplateCatalog;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Where the template catalog comes from.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Loads the full catalog.
    async fn load(&self) -> AssistResult<TemplateCatalog>;
}

#[async_trait]
impl<T: TemplateSource + ?Sized> TemplateSource for Arc<T> {
    async fn load(&self) -> AssistResult<TemplateCatalog> {
        (**self).load().await
    }
}

/// A source that hands out a fixed catalog.
///
/// Counts how often it was asked, which tests use to check caching.
#[derive(Debug, Default)]
pub struct StaticTemplateSource {
    catalog: TemplateCatalog,
    loads: AtomicUsize,
}

impl StaticTemplateSource {
    /// Creates a source serving `catalog`.
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self {
            catalog,
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of times [`TemplateSource::load`] was called.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    async fn load(&self) -> AssistResult<TemplateCatalog> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.clone())
    }
}

/// Reads the catalog from a JSON file.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the catalog path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    async fn load(&self) -> AssistResult<TemplateCatalog> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AssistError::load_failed(format!("{}: {e}", self.path.display())))?;
        TemplateCatalog::from_json(&json)
    }
}
