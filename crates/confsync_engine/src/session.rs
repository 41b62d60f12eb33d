//! Session-scoped baseline context.

use crate::editor::{unbound_action_names, EditorSurface};
use confsync_core::ConfigDocument;
use std::sync::{Arc, OnceLock};

/// The built-in bindings of an editor, before any user override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    bindings: ConfigDocument,
    unbound_actions: Vec<String>,
}

impl Baseline {
    /// Reads the baseline from an editor's current state.
    pub fn capture(editor: &dyn EditorSurface) -> Self {
        Self {
            bindings: editor.live_bindings(),
            unbound_actions: unbound_action_names(editor),
        }
    }

    /// Default keystroke → action bindings.
    pub fn bindings(&self) -> &ConfigDocument {
        &self.bindings
    }

    /// Actions that had no keystroke by default.
    pub fn unbound_actions(&self) -> &[String] {
        &self.unbound_actions
    }
}

/// State shared by everything that synchronizes bindings in one session.
///
/// The baseline is captured at most once per session: the first capture
/// wins and later captures return the frozen value. This assumes every
/// editor instance in the session starts from the same built-in defaults.
#[derive(Debug, Default)]
pub struct SyncSession {
    baseline: OnceLock<Arc<Baseline>>,
}

impl SyncSession {
    /// Creates a session with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the baseline, if captured.
    pub fn baseline(&self) -> Option<Arc<Baseline>> {
        self.baseline.get().cloned()
    }

    /// Returns true once a baseline has been captured.
    pub fn is_captured(&self) -> bool {
        self.baseline.get().is_some()
    }

    /// Captures the baseline from `editor` unless one already exists.
    ///
    /// Returns the session baseline and whether this call captured it.
    pub fn capture_baseline(&self, editor: &dyn EditorSurface) -> (Arc<Baseline>, bool) {
        let mut captured = false;
        let baseline = self
            .baseline
            .get_or_init(|| {
                captured = true;
                Arc::new(Baseline::capture(editor))
            })
            .clone();
        (baseline, captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::MemoryEditor;

    #[test]
    fn first_capture_wins() {
        let session = SyncSession::new();
        assert!(!session.is_captured());

        let first = MemoryEditor::with_defaults([("ctrl+s", "save")], ["gotoLine"]);
        let second = MemoryEditor::with_bindings([("ctrl+s", "saveAll")]);

        let (baseline, captured) = session.capture_baseline(&first);
        assert!(captured);
        assert_eq!(baseline.bindings().value("ctrl+s"), Some("save"));
        assert_eq!(baseline.unbound_actions(), ["gotoLine"]);

        let (again, captured) = session.capture_baseline(&second);
        assert!(!captured);
        assert_eq!(again, baseline);
        assert_eq!(session.baseline().unwrap().bindings().value("ctrl+s"), Some("save"));
    }

    #[test]
    fn baseline_is_frozen_against_later_edits() {
        let session = SyncSession::new();
        let editor = MemoryEditor::with_bindings([("ctrl+s", "save")]);
        session.capture_baseline(&editor);

        editor.bind("ctrl+s", None);
        assert_eq!(session.baseline().unwrap().bindings().value("ctrl+s"), Some("save"));
    }
}
