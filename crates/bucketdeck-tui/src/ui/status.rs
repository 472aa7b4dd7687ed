//! Status line and activity log widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use bucketdeck_ops::StatusMessage;

use super::display_width;
use crate::theme::Theme;

/// The single-line status bar.
pub struct StatusLine<'a> {
    theme: &'a Theme,
    message: Option<&'a StatusMessage>,
    hint: Option<&'a str>,
}

impl<'a> StatusLine<'a> {
    pub fn new(theme: &'a Theme, message: Option<&'a StatusMessage>) -> Self {
        Self {
            theme,
            message,
            hint: None,
        }
    }

    /// Right-aligned key hint.
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let mut hint_width = 0;
        if let Some(hint) = self.hint {
            hint_width = display_width(hint).min(area.width);
            let hint_area = Rect::new(area.right() - hint_width, area.y, hint_width, 1);
            Paragraph::new(Span::styled(hint, self.theme.help_desc)).render(hint_area, buf);
        }

        if let Some(message) = self.message {
            let text_area = Rect::new(area.x, area.y, area.width - hint_width, 1);
            Paragraph::new(Span::styled(
                format!(" {}", message.text),
                self.theme.status_style(message.level),
            ))
            .render(text_area, buf);
        }
    }
}

/// Recent status messages, newest at the bottom.
pub struct ActivityLog<'a> {
    theme: &'a Theme,
    history: &'a [StatusMessage],
}

impl<'a> ActivityLog<'a> {
    pub fn new(theme: &'a Theme, history: &'a [StatusMessage]) -> Self {
        Self { theme, history }
    }
}

impl Widget for ActivityLog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Activity ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = usize::from(inner.height);
        let skip = self.history.len().saturating_sub(rows);
        let lines: Vec<Line> = self.history[skip..]
            .iter()
            .map(|m| Line::styled(m.text.as_str(), self.theme.status_style(m.level)))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
