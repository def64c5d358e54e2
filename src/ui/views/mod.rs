//! Section views
//!
//! Each view owns the panel(s) of one portal section. Views are created when
//! their section is selected and dropped when another is, which releases
//! their subscriptions.

pub mod credentials;
pub mod database;
pub mod placeholder;
pub mod projects;
pub mod query;
pub mod status;
pub mod users;

pub use credentials::CredentialView;
pub use database::DatabaseView;
pub use placeholder::PlaceholderView;
pub use projects::ProjectsView;
pub use query::QueryView;
pub use status::{OverviewView, StatusView};
pub use users::UsersView;

use crate::events::Event;
use crate::ui::components::panel_block;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Paragraph;
use std::collections::VecDeque;

/// Application state a view may draw but never owns.
pub struct ViewContext<'a> {
    pub activity: &'a VecDeque<Event>,
}

pub trait SectionView {
    /// Applies finished background work.
    fn tick(&mut self);

    fn handle_key(&mut self, key: KeyEvent);

    fn render(&self, f: &mut Frame, area: Rect, view_ctx: &ViewContext);

    /// Key hints for the footer.
    fn hints(&self) -> &'static str;

    /// True while the view takes raw text, which suspends global shortcuts.
    fn captures_input(&self) -> bool {
        false
    }
}

/// Centered status line used for loading and empty lists.
pub(crate) fn render_notice(f: &mut Frame, area: Rect, title: &str, text: &str) {
    let notice = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(panel_block(title));
    f.render_widget(notice, area);
}
