//! Toast notifications
//!
//! Short-lived messages stacked in the top-right corner.

use crate::consts::cli_consts::ui::{MAX_TOASTS, toast_ttl};
use crate::events::{Event, EventType};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use std::collections::VecDeque;
use std::time::Instant;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: VecDeque<(Event, Instant)>,
}

impl ToastStack {
    /// Shows `event` until the toast TTL elapses. The oldest toast makes room
    /// when the stack is full.
    pub fn push(&mut self, event: Event) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back((event, Instant::now() + toast_ttl()));
    }

    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|(_, expires)| *expires > now);
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.toasts.iter().map(|(event, _)| event)
    }
}

pub fn render_toasts(f: &mut Frame, area: Rect, stack: &ToastStack) {
    let width = TOAST_WIDTH.min(area.width);
    for (index, event) in stack.iter().enumerate() {
        let y = area.y + 1 + index as u16 * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, TOAST_HEIGHT);
        let color = match event.event_type {
            EventType::Success => Color::Green,
            EventType::Error => Color::Red,
            _ => Color::Cyan,
        };
        let toast = Paragraph::new(Line::from(Span::raw(event.msg.clone())))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(
                        event.title.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(toast, rect);
    }
}
