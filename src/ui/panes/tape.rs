//! Virtual tape pane rendering
//!
//! One row per logical position, showing the symbol it currently reads as and
//! the physical cell its slot points at. The row under the virtual head is
//! highlighted and kept on screen while stepping.

use super::utils::{clamp_scroll, follow_row, pane_block, visible_height};
use crate::machine::mediator::WormTape;
use crate::tape::display_symbol;
use crate::tape::virtual_tape::Slot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Rows past the furthest interesting position that are still shown
const TRAILING_ROWS: usize = 8;

/// Scroll state shared by the two tape panes
#[derive(Debug, Default)]
pub struct TapeScrollState {
    pub offset: usize,
    /// Head row the offset was last adjusted for
    pub followed_row: Option<usize>,
}

/// Data needed to render the virtual tape pane
pub struct VirtualTapeRenderData<'a> {
    pub tape: &'a WormTape,
    pub head_position: usize,
}

/// Render the virtual tape pane
pub fn render_virtual_tape_pane(
    frame: &mut Frame,
    area: Rect,
    data: VirtualTapeRenderData,
    is_focused: bool,
    scroll_state: &mut TapeScrollState,
) {
    let slots = data.tape.slots();
    let title = format!(
        " Virtual Tape ({}/{} written) ",
        slots.bound_count(),
        slots.capacity()
    );
    let block = pane_block(&title, is_focused);

    let last_bound = slots
        .slots()
        .iter()
        .rposition(|slot| matches!(slot, Slot::Bound(_)))
        .unwrap_or(0);
    let shown = (last_bound.max(data.head_position) + TRAILING_ROWS).min(slots.capacity());

    let all_items: Vec<ListItem> = (0..shown)
        .map(|position| {
            let is_head = position == data.head_position;
            let symbol = data.tape.peek(position).unwrap_or_default();

            let marker = if is_head { "▶ " } else { "  " };
            let mapping = match slots.slot(position) {
                Ok(Slot::Bound(index)) => Span::styled(
                    format!("→ cell {}", index),
                    Style::default().fg(DEFAULT_THEME.primary),
                ),
                _ => Span::styled("pristine", Style::default().fg(DEFAULT_THEME.comment)),
            };

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{:>5}", position),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::raw(" │ "),
                Span::styled(
                    format!("{:<4}", display_symbol(symbol)),
                    Style::default()
                        .fg(DEFAULT_THEME.symbol)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" │ "),
                mapping,
            ]);

            let item = ListItem::new(line);
            if is_head {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    let height = visible_height(area.height);
    follow_row(
        &mut scroll_state.offset,
        data.head_position,
        &mut scroll_state.followed_row,
        height,
    );
    clamp_scroll(&mut scroll_state.offset, all_items.len(), height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
