//! Keymap command implementation.

use confsync_core::{ConfigDocument, Patch};
use confsync_engine::{DirRemoteConfig, Platform, RemoteConfigService, SyncConfig};
use serde::Serialize;
use std::path::Path;

/// What to do with a stored keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapAction {
    /// Print the stored overrides.
    Show,
    /// Replace the stored overrides with an empty document.
    Reset,
}

/// A stored keymap override document.
#[derive(Debug, Serialize)]
pub struct KeymapOverrides {
    /// Remote document name.
    pub name: String,
    /// Keystrokes bound to a non-default action.
    pub rebound: Vec<(String, String)>,
    /// Keystrokes whose default binding was removed.
    pub unbound: Vec<String>,
}

impl KeymapOverrides {
    /// Splits a stored patch into rebound and unbound keystrokes.
    pub fn from_patch(name: impl Into<String>, patch: &Patch) -> Self {
        let mut rebound = Vec::new();
        let mut unbound = Vec::new();
        for (keystroke, action) in patch.iter() {
            match action {
                Some(action) => rebound.push((keystroke.to_string(), action.to_string())),
                None => unbound.push(keystroke.to_string()),
            }
        }
        Self {
            name: name.into(),
            rebound,
            unbound,
        }
    }
}

/// Builds the sync configuration for `platform`, or the current one.
pub fn sync_config(platform: Option<&str>) -> SyncConfig {
    let platform = platform.map_or_else(Platform::current, Platform::from_os_name);
    SyncConfig::new().with_platform(platform)
}

/// Runs the keymap command.
pub async fn run(
    dir: &Path,
    platform: Option<&str>,
    action: KeymapAction,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = sync_config(platform);
    let name = config.config_name();
    let remote = DirRemoteConfig::new(dir);

    match action {
        KeymapAction::Show => {
            let patch = remote.fetch(&name).await?;
            let overrides = KeymapOverrides::from_patch(&name, &patch);
            match format {
                "json" => println!("{}", serde_json::to_string_pretty(&overrides)?),
                _ => print_text_output(&overrides),
            }
        }
        KeymapAction::Reset => {
            remote.store(&name, &ConfigDocument::new()).await?;
            println!("Reset {name} to defaults");
        }
    }
    Ok(())
}

fn print_text_output(overrides: &KeymapOverrides) {
    println!("Keymap {}", overrides.name);
    if overrides.rebound.is_empty() && overrides.unbound.is_empty() {
        println!("  (defaults)");
        return;
    }
    for (keystroke, action) in &overrides.rebound {
        println!("  {keystroke:<20} {action}");
    }
    for keystroke in &overrides.unbound {
        println!("  {keystroke:<20} (unbound)");
    }
}
