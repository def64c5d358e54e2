//! Section sidebar component

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use super::panel_block;

/// Render the section list with the selected entry highlighted.
pub fn render_sidebar(f: &mut Frame, area: Rect, title: &str, items: &[String], selected: usize) {
    let list = List::new(items.iter().map(|item| ListItem::new(item.as_str())))
        .block(panel_block(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}
