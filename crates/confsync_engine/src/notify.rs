//! Binding change notifications.

/// Observer told about every binding change made through the coordinator.
///
/// UI that lists key bindings (a help panel, a command palette) registers
/// one of these to refresh itself.
pub trait BindingListener: Send + Sync {
    /// Called after `keystroke` was bound to `action` (or unbound) on
    /// every editor, before the change is persisted.
    fn bindings_changed(&self, keystroke: &str, action: Option<&str>);
}
