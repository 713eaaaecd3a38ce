//! Rule table pane rendering
//!
//! Lists every rule in table order with the rule that produced the current
//! snapshot highlighted, and the current control state in the title.

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::machine::rules::RuleTable;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the rules pane
pub struct RulesRenderData<'a> {
    pub rules: &'a RuleTable,
    pub state_name: &'a str,
    pub last_rule: Option<usize>,
    pub halted: bool,
}

/// Render the rules pane
pub fn render_rules_pane(
    frame: &mut Frame,
    area: Rect,
    data: RulesRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = if data.halted {
        format!(" Rules │ state {} (halted) ", data.state_name)
    } else {
        format!(" Rules │ state {} ", data.state_name)
    };
    let block = pane_block(&title, is_focused);

    if data.rules.is_empty() {
        let paragraph = Paragraph::new("(empty rule table: halts immediately)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let all_items: Vec<ListItem> = data
        .rules
        .rules()
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let fired = data.last_rule == Some(index);
            let text_style = if fired {
                Style::default()
                    .fg(DEFAULT_THEME.state_name)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>3} ", index),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(data.rules.describe(rule), text_style),
            ]);

            let item = ListItem::new(line);
            if fired {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    let height = visible_height(area.height);
    clamp_scroll(scroll_offset, all_items.len(), height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
