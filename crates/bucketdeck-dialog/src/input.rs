//! Text field state for prompt dialogs.

use crate::DialogKey;

/// State of the dialog's single-line text field.
///
/// The cursor counts characters, not bytes, so multi-byte names edit
/// correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// The current input buffer.
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
    /// Whole buffer selected; the next edit replaces it.
    selected: bool,
}

impl InputState {
    /// Create an empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input state seeded with `value`, fully selected.
    pub fn with_selected(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.chars().count(),
            selected: !value.is_empty(),
        }
    }

    /// Get the current buffer contents.
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Get the cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the whole buffer is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.selected = false;
    }

    /// Apply an editing key. Returns `true` if the key was an editing key.
    pub fn apply(&mut self, key: DialogKey) -> bool {
        match key {
            DialogKey::Char(c) => {
                if self.selected {
                    self.clear();
                }
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            }

            DialogKey::Backspace => {
                if self.selected {
                    self.clear();
                } else if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            }

            DialogKey::Delete => {
                if self.selected {
                    self.clear();
                } else if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            }

            DialogKey::Left => {
                self.cursor = if self.selected {
                    0
                } else {
                    self.cursor.saturating_sub(1)
                };
                self.selected = false;
            }

            DialogKey::Right => {
                self.cursor = if self.selected {
                    self.char_len()
                } else {
                    (self.cursor + 1).min(self.char_len())
                };
                self.selected = false;
            }

            DialogKey::Home => {
                self.cursor = 0;
                self.selected = false;
            }

            DialogKey::End => {
                self.cursor = self.char_len();
                self.selected = false;
            }

            DialogKey::ClearLine => self.clear(),

            DialogKey::DeleteWord => {
                if self.selected {
                    self.clear();
                } else if self.cursor > 0 {
                    let end = self.byte_index(self.cursor);
                    let before = &self.buffer[..end];
                    let trimmed = before.trim_end();
                    let start = trimmed
                        .rfind(char::is_whitespace)
                        .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
                        .unwrap_or(0);
                    let removed = self.buffer[start..end].chars().count();
                    self.buffer.replace_range(start..end, "");
                    self.cursor -= removed;
                }
            }

            DialogKey::Escape | DialogKey::Enter | DialogKey::Tab | DialogKey::BackTab => {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.apply(DialogKey::Char(c));
        }
    }

    #[test]
    fn test_input_basic() {
        let mut input = InputState::new();
        type_str(&mut input, "test");

        assert_eq!(input.value(), "test");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_selected_default_is_replaced() {
        let mut input = InputState::with_selected("old.txt");
        assert!(input.is_selected());

        type_str(&mut input, "new");
        assert_eq!(input.value(), "new");
        assert!(!input.is_selected());
    }

    #[test]
    fn test_cursor_keeps_selection_text() {
        let mut input = InputState::with_selected("report.pdf");
        input.apply(DialogKey::End);
        input.apply(DialogKey::Backspace);

        assert_eq!(input.value(), "report.pd");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputState::with_selected("文件.txt");
        input.apply(DialogKey::Home);
        input.apply(DialogKey::Right);
        input.apply(DialogKey::Delete);

        assert_eq!(input.value(), "文.txt");
        assert_eq!(input.cursor(), 1);

        input.apply(DialogKey::Char('档'));
        assert_eq!(input.value(), "文档.txt");
    }

    #[test]
    fn test_cursor_movement() {
        let mut input = InputState::new();
        type_str(&mut input, "test");

        input.apply(DialogKey::Home);
        assert_eq!(input.cursor(), 0);

        input.apply(DialogKey::End);
        assert_eq!(input.cursor(), 4);

        input.apply(DialogKey::Left);
        assert_eq!(input.cursor(), 3);

        input.apply(DialogKey::Right);
        input.apply(DialogKey::Right);
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_delete_word() {
        let mut input = InputState::new();
        type_str(&mut input, "new folder name");

        input.apply(DialogKey::DeleteWord);
        assert_eq!(input.value(), "new folder ");
        assert_eq!(input.cursor(), 11);
    }

    #[test]
    fn test_non_editing_keys() {
        let mut input = InputState::new();
        assert!(!input.apply(DialogKey::Enter));
        assert!(!input.apply(DialogKey::Escape));
        assert!(input.apply(DialogKey::ClearLine));
    }
}
