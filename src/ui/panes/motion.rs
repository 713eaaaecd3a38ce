//! Motion log pane rendering

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::tape::head::MotionLog;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the physical head's motion log
pub fn render_motion_pane(
    frame: &mut Frame,
    area: Rect,
    log: &MotionLog,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Head Motion ({} steps) ", log.len());
    let block = pane_block(&title, is_focused);

    if log.is_empty() {
        let paragraph = Paragraph::new("(head has not moved)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = log
        .get_output()
        .into_iter()
        .zip(log.entries())
        .enumerate()
        .map(|(n, (text, motion))| {
            ListItem::new(format!("{:>6}  {} → {}", n + 1, text, motion.to))
                .style(Style::default().fg(DEFAULT_THEME.fg))
        })
        .collect();

    // usize::MAX pins the view to the newest entries
    clamp_scroll(scroll_offset, all_items.len(), visible_height(area.height));

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height(area.height))
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
