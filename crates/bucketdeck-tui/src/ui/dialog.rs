//! Confirm/prompt dialog widget.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthChar;

use bucketdeck_dialog::{
    DialogEvent, DialogFocus, DialogSnapshot, DialogView, InputView, PointerTarget, Visibility,
};

use super::{centered_popup, display_width, wrapped_height};
use crate::theme::Theme;

const POPUP_WIDTH: u16 = 60;
const CLOSE_MARK: &str = "[x]";

/// Where each part of the dialog lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub popup: Rect,
    pub close: Rect,
    pub message: Rect,
    pub input: Option<Rect>,
    pub confirm: Rect,
    pub cancel: Option<Rect>,
    pub help: Rect,
}

impl DialogLayout {
    /// Lay out `view` centered in `area`.
    pub fn compute(area: Rect, view: &DialogView) -> Self {
        let inner_width = POPUP_WIDTH
            .min(area.width.saturating_sub(4))
            .saturating_sub(2);
        let message_height = wrapped_height(&view.message, inner_width);
        let input_rows = if view.input.is_some() { 2 } else { 0 };

        // message, blank, [input, blank], buttons, blank, help, borders
        let height = message_height + input_rows + 4 + 2;
        let popup = centered_popup(area, POPUP_WIDTH, height);
        let inner = Rect::new(
            popup.x.saturating_add(1),
            popup.y.saturating_add(1),
            popup.width.saturating_sub(2),
            popup.height.saturating_sub(2),
        );

        let mut y = inner.y;
        let message = Rect::new(inner.x, y, inner.width, message_height);
        y = y.saturating_add(message_height + 1);

        let input = view.input.as_ref().map(|_| {
            let rect = Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1);
            y = y.saturating_add(2);
            rect
        });

        let confirm_width = display_width(&view.confirm_label) + 2;
        let confirm = Rect::new(
            inner.right().saturating_sub(confirm_width + 1),
            y,
            confirm_width,
            1,
        );
        let cancel = view.cancel_label.as_ref().map(|label| {
            let width = display_width(label) + 2;
            Rect::new(confirm.x.saturating_sub(width + 2), y, width, 1)
        });

        let help = Rect::new(inner.x, y.saturating_add(2), inner.width, 1);
        let close = Rect::new(popup.right().saturating_sub(4), popup.y, 3, 1);

        Self {
            popup,
            close: close.intersection(popup),
            message: message.intersection(inner),
            input: input.map(|r| r.intersection(inner)),
            confirm: confirm.intersection(inner),
            cancel: cancel.map(|r| r.intersection(inner)),
            help: help.intersection(inner),
        }
    }

    /// Translate a click at (`column`, `row`) into a dialog event.
    pub fn hit(&self, column: u16, row: u16) -> DialogEvent {
        let position = Position::new(column, row);

        if self.close.contains(position) {
            DialogEvent::Pointer(PointerTarget::DismissControl)
        } else if self.confirm.contains(position) {
            DialogEvent::Confirm
        } else if self.cancel.is_some_and(|r| r.contains(position)) {
            DialogEvent::Cancel
        } else if self.popup.contains(position) {
            DialogEvent::Pointer(PointerTarget::Content)
        } else {
            DialogEvent::Pointer(PointerTarget::Backdrop)
        }
    }
}

/// Modal dialog over a dimmed backdrop.
pub struct DialogModal<'a> {
    theme: &'a Theme,
    snapshot: &'a DialogSnapshot,
}

impl<'a> DialogModal<'a> {
    pub fn new(theme: &'a Theme, snapshot: &'a DialogSnapshot) -> Self {
        Self { theme, snapshot }
    }
}

impl Widget for DialogModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(view) = &self.snapshot.view else {
            return;
        };
        if self.snapshot.visibility == Visibility::Hidden {
            return;
        }
        let closing = self.snapshot.visibility == Visibility::Closing;
        let theme = self.theme;
        let layout = DialogLayout::compute(area, view);

        buf.set_style(area, theme.backdrop);
        Clear.render(layout.popup, buf);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if closing { theme.closing } else { theme.border });
        if let Some(title) = &view.title {
            block = block.title(format!(" {title} ")).title_style(theme.title);
        }
        block.render(layout.popup, buf);

        Paragraph::new(Span::styled(CLOSE_MARK, theme.help_desc)).render(layout.close, buf);

        Paragraph::new(view.message.as_str())
            .style(theme.message)
            .wrap(Wrap { trim: false })
            .render(layout.message, buf);

        if let (Some(input), Some(rect)) = (&view.input, layout.input) {
            let focused = view.focus == DialogFocus::Input && !closing;
            render_input(theme, input, focused, rect, buf);
        }

        let button = |focus: DialogFocus| {
            if view.focus == focus && !closing {
                theme.button_focused
            } else {
                theme.button
            }
        };
        Paragraph::new(Span::styled(
            format!(" {} ", view.confirm_label),
            button(DialogFocus::Confirm),
        ))
        .render(layout.confirm, buf);
        if let (Some(label), Some(rect)) = (&view.cancel_label, layout.cancel) {
            Paragraph::new(Span::styled(format!(" {label} "), button(DialogFocus::Cancel)))
                .render(rect, buf);
        }

        let mut help = vec![
            Span::styled(" Enter ", theme.help_key),
            Span::styled("Confirm  ", theme.help_desc),
        ];
        if view.cancel_label.is_some() {
            help.push(Span::styled(" Esc ", theme.help_key));
            help.push(Span::styled("Cancel  ", theme.help_desc));
        }
        help.push(Span::styled(" Tab ", theme.help_key));
        help.push(Span::styled("Switch", theme.help_desc));
        Paragraph::new(Line::from(help)).render(layout.help, buf);
    }
}

fn render_input(theme: &Theme, input: &InputView, focused: bool, rect: Rect, buf: &mut Buffer) {
    buf.set_style(rect, if focused { theme.input_focused } else { theme.input });

    let mut spans = Vec::new();
    if input.value.is_empty() {
        if focused {
            spans.push(Span::styled(" ", theme.cursor));
        }
        spans.push(Span::styled(input.placeholder.as_str(), theme.placeholder));
    } else if input.selected {
        spans.push(Span::styled(input.value.as_str(), theme.input_selected));
    } else {
        let chars: Vec<char> = input.value.chars().collect();
        let cursor = input.cursor.min(chars.len());
        let start = visible_start(&chars, cursor, rect.width);

        let before: String = chars[start..cursor].iter().collect();
        spans.push(Span::raw(before));

        if focused {
            let at = chars.get(cursor).map_or(" ".to_string(), char::to_string);
            spans.push(Span::styled(at, theme.cursor));
            let after: String = chars.iter().skip(cursor + 1).collect();
            spans.push(Span::raw(after));
        } else {
            let after: String = chars[cursor..].iter().collect();
            spans.push(Span::raw(after));
        }
    }

    Paragraph::new(Line::from(spans)).render(rect, buf);
}

/// First character shown so the cursor cell stays inside `width` columns.
fn visible_start(chars: &[char], cursor: usize, width: u16) -> usize {
    let budget = usize::from(width.saturating_sub(1));
    let mut used = 0;
    let mut start = cursor;
    while start > 0 {
        let w = chars[start - 1].width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start -= 1;
    }
    start
}
