//! Templates command implementation.

use confsync_assist::{
    AssistConfig, FileTemplateSource, Proposal, TemplateCache, TemplateContentAssist,
};
use confsync_storage::{EvictingStore, FileMedium};
use std::path::Path;
use std::sync::Arc;

/// Computes the proposals for `prefix` typed up to `offset` in `scope`.
///
/// With `cache`, the catalog is cached in that file between runs.
pub async fn proposals(
    file: &Path,
    cache: Option<&Path>,
    scope: &str,
    prefix: &str,
    offset: usize,
) -> Result<Vec<Proposal>, Box<dyn std::error::Error>> {
    let source = FileTemplateSource::new(file);
    let config = AssistConfig::default();

    let proposals = match cache {
        Some(path) => {
            let store = EvictingStore::new(FileMedium::open_with_create_dirs(path, None)?);
            let cache = Arc::new(TemplateCache::with_store(source, config, store));
            let assist = TemplateContentAssist::new(scope, cache);
            assist.install().await?;
            assist.compute_proposals(prefix, offset)
        }
        None => {
            let cache = Arc::new(TemplateCache::new(source, config));
            let assist = TemplateContentAssist::new(scope, cache);
            assist.install().await?;
            assist.compute_proposals(prefix, offset)
        }
    };
    Ok(proposals)
}

/// Runs the templates command.
pub async fn run(
    file: &Path,
    cache: Option<&Path>,
    scope: &str,
    prefix: &str,
    offset: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let offset = offset.unwrap_or(prefix.len());
    let proposals = proposals(file, cache, scope, prefix, offset).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&proposals)?),
        _ => {
            if proposals.is_empty() {
                println!("No templates for {prefix:?} in scope {scope}");
            }
            for proposal in &proposals {
                println!("{}", proposal.description);
                for line in proposal.proposal.lines() {
                    println!("    {line}");
                }
            }
        }
    }
    Ok(())
}
