//! Template loading through a file source and a file-backed cache.

use confsync_assist::{
    AssistConfig, FileTemplateSource, TemplateCache, TemplateContentAssist,
};
use confsync_storage::{EvictingStore, FileMedium};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const TEMPLATES: &str = r#"{
    "js": [
        {"trigger": "func", "proposal": "function name() {\n}", "description": "function", "positions": {"offset": 9, "length": 4}}
    ]
}"#;

#[tokio::test]
async fn cached_catalog_outlives_the_source() {
    let dir = tempdir().unwrap();
    let templates = dir.path().join("templates.json");
    let cache_file = dir.path().join("cache.json");
    std::fs::write(&templates, TEMPLATES).unwrap();

    {
        let store = EvictingStore::new(FileMedium::open(&cache_file, None).unwrap());
        let cache = Arc::new(TemplateCache::with_store(
            FileTemplateSource::new(&templates),
            AssistConfig::default(),
            store,
        ));
        let assist = TemplateContentAssist::new("js", cache);
        assist.install().await.unwrap();
        assert_eq!(assist.compute_proposals("fu", 2).len(), 1);
    }

    // The source goes away; the cached copy on disk is still fresh.
    std::fs::remove_file(&templates).unwrap();

    let store = EvictingStore::new(FileMedium::open(&cache_file, None).unwrap());
    let cache = Arc::new(TemplateCache::with_store(
        FileTemplateSource::new(&templates),
        AssistConfig::default(),
        store,
    ));
    let assist = TemplateContentAssist::new("js", cache.clone());
    assist.install().await.unwrap();

    let proposals = assist.compute_proposals("func", 50);
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposal, "function name() {\n}");
    assert!(cache.cached_at().is_some());
}

#[tokio::test]
async fn expired_cache_falls_back_to_source() {
    let dir = tempdir().unwrap();
    let templates = dir.path().join("templates.json");
    let cache_file = dir.path().join("cache.json");

    let store = EvictingStore::new(FileMedium::open(&cache_file, None).unwrap());
    let cache = Arc::new(TemplateCache::with_store(
        FileTemplateSource::new(&templates),
        AssistConfig::default().max_age(Duration::ZERO),
        store,
    ));
    let assist = TemplateContentAssist::new("js", cache);

    // No source and no cached copy: install fails and nothing is offered.
    assert!(assist.install().await.is_err());
    assert!(!assist.is_installed());
    assert!(assist.compute_proposals("", 0).is_empty());

    std::fs::write(&templates, TEMPLATES).unwrap();
    assist.install().await.unwrap();
    assert_eq!(assist.compute_proposals("", 0).len(), 1);
}
