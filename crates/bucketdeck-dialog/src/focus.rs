//! Focus capture and restoration.

use std::sync::Arc;

/// Anything that can take keyboard focus back after a dialog closes.
pub trait Focusable: Send + Sync {
    fn focus(&self);
}

/// Reports which element holds focus when a dialog opens.
///
/// The controller keeps only a weak reference to the returned element, so an
/// element torn down while the dialog is open is simply not refocused.
pub trait FocusHost: Send + Sync {
    fn active_element(&self) -> Option<Arc<dyn Focusable>>;
}

/// Which dialog control holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogFocus {
    Input,
    Confirm,
    Cancel,
}
