//! Activity log component
//!
//! Renders the events raised during this session, newest first

use crate::events::{Event, EventType};
use crate::logging::LogLevel;
use crate::ui::utils::format_compact_timestamp;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};
use std::collections::VecDeque;

fn event_color(event: &Event) -> Color {
    match event.event_type {
        EventType::Success => Color::Green,
        EventType::Error => Color::Red,
        EventType::Info => Color::White,
        EventType::Refresh => Color::DarkGray,
    }
}

/// Render the activity log panel.
pub fn render_activity_log(f: &mut Frame, area: Rect, logs: &VecDeque<Event>) {
    // Borders and padding take three rows
    let log_count = (area.height.saturating_sub(3) as usize).max(1);

    let log_lines: Vec<Line> = logs
        .iter()
        .filter(|event| event.should_display())
        .rev()
        .take(log_count)
        .map(|event| {
            let status_icon = match (event.event_type, event.log_level) {
                (EventType::Success, _) => "✅",
                (EventType::Error, LogLevel::Error) => "❌",
                (EventType::Error, _) => "⚠",
                (EventType::Info, _) => "ℹ",
                (EventType::Refresh, _) => "",
            };
            Line::from(vec![
                Span::raw(format!("{} ", status_icon)),
                Span::styled(
                    format!("{} ", format_compact_timestamp(&event.timestamp)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(event.msg.clone(), Style::default().fg(event_color(event))),
            ])
        })
        .collect();

    let log_paragraph = if log_lines.is_empty() {
        Paragraph::new(vec![Line::from("No activity yet.")])
    } else {
        Paragraph::new(log_lines)
    };

    let logs_block = Block::default()
        .title("RECENT ACTIVITY")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    f.render_widget(log_paragraph.block(logs_block).wrap(Wrap { trim: true }), area);
}
