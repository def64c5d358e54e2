//! Creator portal layout

use super::{CreatorSection, CreatorState};
use crate::ui::components::header::status_indicator;
use crate::ui::components::{panel_block, render_footer, render_header};
use crate::ui::views::ViewContext;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::Tabs;
use strum::IntoEnumIterator;

pub fn render_creator(f: &mut Frame, area: Rect, state: &CreatorState, view_ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .split(area);

    let indicators = state
        .service_health()
        .into_iter()
        .map(|(service, up)| status_indicator(service, up))
        .collect();
    render_header(f, chunks[0], "Creator Portal", indicators);

    let titles: Vec<String> = CreatorSection::iter().map(|s| s.to_string()).collect();
    let selected = CreatorSection::iter()
        .position(|s| s == state.section())
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(panel_block("SECTIONS"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[1]);

    state.view().render(f, chunks[2], view_ctx);
    render_footer(f, chunks[3], state.view().hints());
}
