//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use bucketdeck_dialog::{DialogEvent, DialogFocus, DialogKey};

use crate::ui::DialogLayout;

/// Key action outside of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Abandon the running operation.
    Interrupt,
    /// Leave once the operation has finished.
    Dismiss,
    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Interrupt,
            (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => KeyAction::Dismiss,
            (KeyCode::Enter, _) => KeyAction::Dismiss,
            _ => KeyAction::None,
        }
    }
}

/// Translate a key press into a dialog event.
///
/// `focus` is the dialog's current focus. Enter and Space press a focused
/// button; Enter in the text field goes to the controller as a key.
pub fn dialog_event(event: KeyEvent, focus: Option<DialogFocus>) -> Option<DialogEvent> {
    let on_button = matches!(focus, Some(DialogFocus::Confirm | DialogFocus::Cancel));
    let key = |k| Some(DialogEvent::Key(k));

    match (event.code, event.modifiers) {
        (KeyCode::Esc, _) => key(DialogKey::Escape),
        (KeyCode::Enter, _) if on_button => Some(DialogEvent::Activate),
        (KeyCode::Enter, _) => key(DialogKey::Enter),
        (KeyCode::Tab, _) => key(DialogKey::Tab),
        (KeyCode::BackTab, _) => key(DialogKey::BackTab),

        // Buttons
        (KeyCode::Char(' '), _) if on_button => Some(DialogEvent::Activate),
        (KeyCode::Char('y'), KeyModifiers::NONE) if on_button => Some(DialogEvent::Confirm),
        (KeyCode::Char('n'), KeyModifiers::NONE) if on_button => Some(DialogEvent::Cancel),
        (KeyCode::Left, _) if on_button => key(DialogKey::BackTab),
        (KeyCode::Right, _) if on_button => key(DialogKey::Tab),

        // Text field editing
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => key(DialogKey::ClearLine),
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => key(DialogKey::DeleteWord),
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => key(DialogKey::Home),
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => key(DialogKey::End),
        (KeyCode::Char(c), m) if m.difference(KeyModifiers::SHIFT).is_empty() => {
            key(DialogKey::Char(c))
        }
        (KeyCode::Backspace, _) => key(DialogKey::Backspace),
        (KeyCode::Delete, _) => key(DialogKey::Delete),
        (KeyCode::Left, _) => key(DialogKey::Left),
        (KeyCode::Right, _) => key(DialogKey::Right),
        (KeyCode::Home, _) => key(DialogKey::Home),
        (KeyCode::End, _) => key(DialogKey::End),

        _ => None,
    }
}

/// Translate a left click into a dialog event using the last drawn layout.
pub fn pointer_event(event: MouseEvent, layout: &DialogLayout) -> Option<DialogEvent> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(layout.hit(event.column, event.row)),
        _ => None,
    }
}
