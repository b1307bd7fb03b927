//! Host editor selection

use std::sync::{Arc, RwLock};

/// Supplies the host editor's current text selection
pub trait SelectionSource: Send + Sync {
    /// Current selection, if any
    fn selected_text(&self) -> Option<String>;
}

/// Host without an editor selection
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSelection;

impl SelectionSource for NoSelection {
    fn selected_text(&self) -> Option<String> {
        None
    }
}

/// Selection pushed in by the host, shared across handlers
#[derive(Debug, Default, Clone)]
pub struct SharedSelection {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedSelection {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection
    pub fn set(&self, text: impl Into<String>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(text.into());
    }

    /// Clear the selection
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SelectionSource for SharedSelection {
    fn selected_text(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
