//! UI rendering components.

mod dialog;
mod status;

pub use dialog::{DialogLayout, DialogModal};
pub use status::{ActivityLog, StatusLine};

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Center a `width` x `height` popup inside `area`, shrinking it to fit.
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2 + area.x;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2 + area.y;

    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Terminal columns taken by `text`.
pub fn display_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

/// Rows needed to show `text` wrapped at `width` columns.
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    text.lines()
        .map(|line| display_width(line).div_ceil(width).max(1))
        .sum::<u16>()
        .max(1)
}
