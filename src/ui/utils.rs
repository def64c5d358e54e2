//! UI utility functions
//!
//! Helpers shared by both portals.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" or RFC 3339 "YYYY-MM-DDTHH:MM:SS..."
    let mut parts = timestamp.splitn(2, [' ', 'T']);
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Date portion of a backend timestamp, or a dash.
pub fn format_date(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) if ts.len() >= 10 => ts[..10].to_string(),
        Some(ts) if !ts.is_empty() => ts.to_string(),
        _ => "—".to_string(),
    }
}

pub fn enabled_color(enabled: bool) -> Color {
    if enabled { Color::Green } else { Color::Red }
}

/// "used / limit", or just "used" for uncapped counters.
pub fn format_usage(used: i64, limit: i64) -> String {
    if limit > 0 {
        format!("{} / {}", used, limit)
    } else {
        used.to_string()
    }
}

/// A rectangle of `width` x `height` cells centered inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

/// Moves a list selection by `delta`, clamped to `len`.
pub fn step_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}
