//! Live text field values.

use std::sync::Arc;

use tokio::sync::watch;

/// Current text of a form field.
///
/// Cloning shares the same value: the view writes with `set`, the flow reads
/// with `value` when confirm is pressed.
#[derive(Debug, Clone)]
pub struct TextField {
    value: Arc<watch::Sender<String>>,
}

impl TextField {
    /// Create a field with initial text
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(initial.into());
        Self { value: Arc::new(tx) }
    }

    /// Replace the text
    pub fn set(&self, text: impl Into<String>) {
        self.value.send_replace(text.into());
    }

    /// Copy of the current text
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Watch the field for edits
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.value.subscribe()
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new("")
    }
}
