//! Physical store pane rendering
//!
//! Shows the write-once cells in tape order. Each written cell is either
//! *live* (some virtual slot still points at it) or *stale* (its position has
//! since been rewritten elsewhere). The row under the physical head is
//! highlighted.

use super::tape::TapeScrollState;
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
use rustc_hash::FxHashMap;

const TRAILING_ROWS: usize = 8;

/// Render the physical store pane
pub fn render_physical_pane(
    frame: &mut Frame,
    area: Rect,
    tape: &WormTape,
    is_focused: bool,
    scroll_state: &mut TapeScrollState,
) {
    let store = tape.store();
    let head_position = tape.head().current_position();
    let title = format!(
        " Physical Tape ({}/{} written) ",
        store.written_count(),
        store.capacity()
    );
    let block = pane_block(&title, is_focused);

    // physical index -> logical position currently backed by it
    let owners: FxHashMap<usize, usize> = tape
        .slots()
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(position, slot)| match slot {
            Slot::Bound(index) => Some((*index, position)),
            Slot::Pristine => None,
        })
        .collect();

    let shown = (store.written_count().max(head_position + 1) + TRAILING_ROWS)
        .min(store.capacity());

    let all_items: Vec<ListItem> = store.cells()[..shown]
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let is_head = index == head_position;
            let marker = if is_head { "▶ " } else { "  " };

            let (symbol_style, status) = if !cell.written {
                (
                    Style::default().fg(DEFAULT_THEME.comment),
                    Span::styled("fresh", Style::default().fg(DEFAULT_THEME.comment)),
                )
            } else if let Some(position) = owners.get(&index) {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.symbol)
                        .add_modifier(Modifier::BOLD),
                    Span::styled(
                        format!("live ← pos {}", position),
                        Style::default().fg(DEFAULT_THEME.success),
                    ),
                )
            } else {
                (
                    Style::default().fg(DEFAULT_THEME.stale_cell),
                    Span::styled("stale", Style::default().fg(DEFAULT_THEME.stale_cell)),
                )
            };

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{:>5}", index),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::raw(" │ "),
                Span::styled(format!("{:<4}", display_symbol(cell.symbol)), symbol_style),
                Span::raw(" │ "),
                status,
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
        head_position,
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
