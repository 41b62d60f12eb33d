//! Diff command implementation.

use confsync_core::{diff, ConfigDocument, Patch};
use std::fs;
use std::path::Path;

/// Reads a flat JSON document from `path`.
pub fn read_document(path: &Path) -> Result<ConfigDocument, Box<dyn std::error::Error>> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(ConfigDocument::from_json(&bytes)?)
}

/// Computes the patch turning the document at `base` into the one at `target`.
pub fn compute(base: &Path, target: &Path) -> Result<Patch, Box<dyn std::error::Error>> {
    let base = read_document(base)?;
    let target = read_document(target)?;
    Ok(diff(&base, &target))
}

/// Runs the diff command.
pub fn run(base: &Path, target: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let patch = compute(base, target)?;
    tracing::debug!(entries = patch.len(), "computed patch");

    match format {
        "json" => println!("{}", patch.to_json_pretty()?),
        _ => print_text_output(&patch),
    }
    Ok(())
}

fn print_text_output(patch: &Patch) {
    if patch.is_empty() {
        println!("Documents are identical");
        return;
    }
    for (key, value) in patch.iter() {
        match value {
            Some(value) => println!("  set    {key} = {value}"),
            None => println!("  remove {key}"),
        }
    }
}
