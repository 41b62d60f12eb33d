//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random documents, keystrokes and
//! store operations.

use confsync_core::ConfigDocument;
use proptest::prelude::*;

/// Strategy for generating keystroke descriptors such as `ctrl+shift+k`.
pub fn keystroke_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::subsequence(vec!["ctrl", "alt", "shift", "meta"], 0..=2),
        prop::string::string_regex("[a-z0-9]|f[1-9]|enter|tab").expect("Invalid regex"),
    )
        .prop_map(|(modifiers, key)| {
            let mut parts: Vec<String> = modifiers.into_iter().map(str::to_string).collect();
            parts.push(key);
            parts.join("+")
        })
}

/// Strategy for generating editor action names.
pub fn action_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-zA-Z]{2,15}").expect("Invalid regex")
}

/// Strategy for generating live binding documents (no null entries).
pub fn binding_document_strategy() -> impl Strategy<Value = ConfigDocument> {
    prop::collection::btree_map(keystroke_strategy(), action_strategy(), 0..24)
        .prop_map(|map| map.into_iter().map(|(k, v)| (k, Some(v))).collect())
}

/// Strategy for generating arbitrary flat documents, null entries included.
pub fn config_document_strategy() -> impl Strategy<Value = ConfigDocument> {
    prop::collection::btree_map(
        prop::string::string_regex("[a-z]{1,6}").expect("Invalid regex"),
        prop::option::of(prop::string::string_regex("[a-z0-9]{0,6}").expect("Invalid regex")),
        0..16,
    )
    .prop_map(ConfigDocument::from)
}

/// Strategy for a base document and an edited copy of it.
///
/// Edits rebind, unbind and add keys, so the two share most entries.
pub fn edited_bindings_strategy() -> impl Strategy<Value = (ConfigDocument, ConfigDocument)> {
    (
        binding_document_strategy(),
        prop::collection::vec(binding_edit_strategy(), 0..8),
    )
        .prop_map(|(base, edits)| {
            let mut target = base.clone();
            let keys: Vec<String> = base.keys().map(str::to_string).collect();
            for edit in edits {
                match edit {
                    BindingEdit::Bind { keystroke, action } => target.set(keystroke, action),
                    BindingEdit::Rebind { index, action } if !keys.is_empty() => {
                        target.set(keys[index % keys.len()].clone(), action);
                    }
                    BindingEdit::Unbind { index } if !keys.is_empty() => {
                        target.remove(&keys[index % keys.len()]);
                    }
                    _ => {}
                }
            }
            (base, target)
        })
}

/// A change a user makes to their bindings.
#[derive(Debug, Clone)]
pub enum BindingEdit {
    /// Bind a possibly new keystroke.
    Bind {
        /// Keystroke to bind.
        keystroke: String,
        /// Action to bind it to.
        action: String,
    },
    /// Point an existing keystroke at another action.
    Rebind {
        /// Index into the existing keystrokes.
        index: usize,
        /// New action.
        action: String,
    },
    /// Remove an existing keystroke.
    Unbind {
        /// Index into the existing keystrokes.
        index: usize,
    },
}

/// Strategy for generating binding edits.
pub fn binding_edit_strategy() -> impl Strategy<Value = BindingEdit> {
    prop_oneof![
        2 => (keystroke_strategy(), action_strategy())
            .prop_map(|(keystroke, action)| BindingEdit::Bind { keystroke, action }),
        2 => (any::<usize>(), action_strategy())
            .prop_map(|(index, action)| BindingEdit::Rebind { index, action }),
        1 => any::<usize>().prop_map(|index| BindingEdit::Unbind { index }),
    ]
}

/// An operation against an evicting store.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Plain write with escalating eviction.
    Write {
        /// Key.
        key: String,
        /// Value.
        value: String,
    },
    /// Timestamped write.
    WriteEntry {
        /// Key.
        key: String,
        /// Value.
        value: String,
    },
    /// Move the clock forward.
    Advance {
        /// Seconds to advance.
        secs: u64,
    },
    /// Purge entries older than an age.
    Purge {
        /// Maximum age in seconds.
        max_age_secs: u64,
    },
}

/// Strategy for generating store operations.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    let key = || prop::string::string_regex("[a-d][0-9]").expect("Invalid regex");
    let value = || prop::string::string_regex("[a-z]{0,40}").expect("Invalid regex");
    prop_oneof![
        2 => (key(), value()).prop_map(|(key, value)| StoreOperation::Write { key, value }),
        4 => (key(), value()).prop_map(|(key, value)| StoreOperation::WriteEntry { key, value }),
        2 => (0u64..3 * 24 * 60 * 60).prop_map(|secs| StoreOperation::Advance { secs }),
        1 => (0u64..2 * 24 * 60 * 60).prop_map(|max_age_secs| StoreOperation::Purge { max_age_secs }),
    ]
}

/// Strategy for generating a sequence of store operations.
pub fn store_operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
