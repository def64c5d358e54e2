//! Developer portal layout

use super::{DeveloperState, Section};
use crate::ui::components::{render_footer, render_header, render_sidebar};
use crate::ui::views::ViewContext;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use strum::IntoEnumIterator;

/// Header, sidebar, the selected section and the footer.
pub fn render_developer(f: &mut Frame, area: Rect, state: &DeveloperState, view_ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .split(area);
    render_header(f, chunks[0], "Developer Portal", Vec::new());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Fill(1)])
        .split(chunks[1]);
    let sections: Vec<String> = Section::iter().map(|s| s.to_string()).collect();
    render_sidebar(f, body[0], "SECTIONS", &sections, state.section().index());
    state.view().render(f, body[1], view_ctx);

    render_footer(f, chunks[2], state.view().hints());
}
