//! Portal components
//!
//! Widgets shared by the Creator and Developer portals.

pub mod footer;
pub mod form;
pub mod header;
pub mod logs;
pub mod sidebar;
pub mod toasts;

pub use footer::render_footer;
pub use form::{FormAction, FormState};
pub use header::render_header;
pub use logs::render_activity_log;
pub use sidebar::render_sidebar;
pub use toasts::{ToastStack, render_toasts};

use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding};

/// The rounded cyan block every panel sits in.
pub fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1))
}
