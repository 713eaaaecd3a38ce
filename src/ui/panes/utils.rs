//! Shared helpers for pane rendering
//!
//! All functions in this module are `pub(super)`, making them accessible only
//! within the panes module.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus-dependent border style
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp a scroll offset so the last page is never scrolled past
pub(super) fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}

/// Adjust a scroll offset so `row` stays on screen, if it moved since the last frame
pub(super) fn follow_row(
    offset: &mut usize,
    row: usize,
    prev_row: &mut Option<usize>,
    visible_height: usize,
) {
    if *prev_row == Some(row) {
        return;
    }
    *prev_row = Some(row);
    if row < *offset {
        *offset = row;
    } else if row >= *offset + visible_height {
        *offset = row + 1 - visible_height;
    }
}

/// Visible content rows inside a bordered pane
pub(super) fn visible_height(area_height: u16) -> usize {
    area_height.saturating_sub(2).max(1) as usize
}
