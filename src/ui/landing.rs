//! Landing screen rendering module.
//!
//! Logo plus the two portal choices.

use crate::ui::utils::centered_rect;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

pub const LOGO_NAME: &str = r#"
  ███████╗ ██╗ ████████╗ ███████╗
  ██╔════╝ ██║ ╚══██╔══╝ ██╔════╝
  ███████╗ ██║    ██║    █████╗
  ╚════██║ ██║    ██║    ██╔══╝
  ███████║ ██║    ██║    ███████╗
  ╚══════╝ ╚═╝    ╚═╝    ╚══════╝
"#;

const TAGLINE: &str = "Transform your YouTube channel into a professional website";

fn portal_card<'a>(key: &'a str, title: &'a str, text: &'a str, color: Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(text),
        Line::from(""),
        Line::from(Span::styled(
            format!("Press [{}]", key),
            Style::default().fg(color),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .padding(Padding::uniform(1)),
    )
}

pub fn render_landing(f: &mut Frame, area: Rect) {
    // Convert LOGO_NAME into styled Lines
    let mut lines: Vec<Line> = LOGO_NAME
        .trim_matches('\n')
        .lines()
        .map(|line| {
            Span::styled(
                line.to_string(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
            .into()
        })
        .collect();
    lines.push(Line::from(Span::raw(" ")));
    lines.push(Line::from(Span::styled(
        TAGLINE,
        Style::default().fg(Color::Gray),
    )));
    lines.push(
        Span::styled(
            format!("Version {}", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::ITALIC),
        )
        .into(),
    );

    let logo_height = lines.len() as u16;
    let content = centered_rect(84, logo_height + 12, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(logo_height),
            Constraint::Length(1),
            Constraint::Length(11),
        ])
        .split(content);

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    f.render_widget(
        portal_card(
            "C",
            "Creator Portal",
            "Chat with the AI assistant and preview your site.",
            Color::Red,
        ),
        cards[0],
    );
    f.render_widget(
        portal_card(
            "D",
            "Developer Portal",
            "API keys, users, projects, database and monitoring.",
            Color::Cyan,
        ),
        cards[1],
    );
}
