//! Portal footer component
//!
//! Renders the key hints of the focused view

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render the footer with view-specific hints followed by the global ones.
pub fn render_footer(f: &mut Frame, area: Rect, hints: &str) {
    let footer_text = if hints.is_empty() {
        "[Tab] Section | [H] Home | [Q] Quit".to_string()
    } else {
        format!("{} | [Tab] Section | [H] Home | [Q] Quit", hints)
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
