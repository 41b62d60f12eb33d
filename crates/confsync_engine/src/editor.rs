//! Editor surface abstraction.

use confsync_core::ConfigDocument;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

/// A live editor whose key bindings the coordinator reads and changes.
///
/// Bindings are reported as a [`ConfigDocument`] mapping keystroke
/// descriptors to action names. Only bound keystrokes appear in it.
///
/// Implementations must keep an action registered after its last
/// keystroke is unbound, so that it can be bound to another key later.
pub trait EditorSurface: Send + Sync {
    /// Current keystroke → action bindings.
    fn live_bindings(&self) -> ConfigDocument;

    /// Every action the editor knows, bound or not, in the editor's order.
    fn action_names(&self) -> Vec<String>;

    /// Binds `keystroke` to `action`, or unbinds it when `action` is `None`.
    fn bind(&self, keystroke: &str, action: Option<&str>);
}

/// Returns the actions of `editor` that no keystroke is bound to.
///
/// Order follows [`EditorSurface::action_names`].
pub fn unbound_action_names(editor: &dyn EditorSurface) -> Vec<String> {
    let bindings = editor.live_bindings();
    let bound: HashSet<&str> = bindings.iter().filter_map(|(_, action)| action).collect();

    editor
        .action_names()
        .into_iter()
        .filter(|name| !bound.contains(name.as_str()))
        .collect()
}

/// An in-process editor surface.
///
/// Useful for tests and for hosts that keep bindings outside a real
/// editor widget.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    bindings: RwLock<BTreeMap<String, String>>,
    actions: RwLock<Vec<String>>,
}

impl MemoryEditor {
    /// Creates an editor with no actions and no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an editor with default bindings.
    pub fn with_bindings<'a>(bindings: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let editor = Self::new();
        for (keystroke, action) in bindings {
            editor.bind(keystroke, Some(action));
        }
        editor
    }

    /// Creates an editor with default bindings and additional unbound actions.
    pub fn with_defaults<'a>(
        bindings: impl IntoIterator<Item = (&'a str, &'a str)>,
        unbound_actions: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let editor = Self::with_bindings(bindings);
        for action in unbound_actions {
            editor.register_action(action);
        }
        editor
    }

    /// Registers an action without binding it.
    pub fn register_action(&self, name: &str) {
        let mut actions = self.actions.write();
        if !actions.iter().any(|a| a == name) {
            actions.push(name.to_string());
        }
    }
}

impl EditorSurface for MemoryEditor {
    fn live_bindings(&self) -> ConfigDocument {
        self.bindings
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect()
    }

    fn action_names(&self) -> Vec<String> {
        self.actions.read().clone()
    }

    fn bind(&self, keystroke: &str, action: Option<&str>) {
        match action {
            Some(action) => {
                self.register_action(action);
                self.bindings
                    .write()
                    .insert(keystroke.to_string(), action.to_string());
            }
            None => {
                self.bindings.write().remove(keystroke);
            }
        }
    }
}
