//! Portal header component
//!
//! Renders the portal title and an optional row of status indicators

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render the header: title on the first line, indicators (if any) below.
pub fn render_header(f: &mut Frame, area: Rect, title: &str, indicators: Vec<Span<'static>>) {
    let version = env!("CARGO_PKG_VERSION");
    let mut lines = vec![Line::from(Span::styled(
        format!("{} v{}", title.to_uppercase(), version),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if !indicators.is_empty() {
        lines.push(Line::from(indicators));
    }

    let header = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(header, area);
}

/// A "● name" indicator colored by health. Unknown services are gray.
pub fn status_indicator(name: &str, up: Option<bool>) -> Span<'static> {
    let color = match up {
        Some(true) => Color::Green,
        Some(false) => Color::Red,
        None => Color::DarkGray,
    };
    Span::styled(format!(" ● {} ", name), Style::default().fg(color))
}
