//! Input events understood by the dialog controller.

/// A user interaction routed to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// The confirm button was clicked.
    Confirm,
    /// The cancel button was clicked.
    Cancel,
    /// The focused button was pressed (Enter/Space on a button).
    Activate,
    /// A pointer press landed somewhere on the dialog layer.
    Pointer(PointerTarget),
    /// A key was pressed while the dialog layer had focus.
    Key(DialogKey),
}

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The backdrop surrounding the dialog content.
    Backdrop,
    /// An element explicitly flagged as a dismiss control.
    DismissControl,
    /// The dialog content itself.
    Content,
}

impl PointerTarget {
    /// Whether a press here dismisses the dialog.
    pub fn dismisses(self) -> bool {
        matches!(self, Self::Backdrop | Self::DismissControl)
    }
}

/// Keys with meaning inside a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKey {
    Escape,
    Enter,
    Tab,
    BackTab,
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Clear the whole line (Ctrl-U).
    ClearLine,
    /// Delete the word before the cursor (Ctrl-W).
    DeleteWord,
}

/// Whether the controller acted on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The event changed the dialog or resolved it.
    Consumed,
    /// No dialog was open, or the event has no meaning in the current state.
    Ignored,
}

impl EventDisposition {
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}
