//! Sections without a backend binding.

use super::{SectionView, ViewContext, render_notice};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub struct PlaceholderView {
    title: String,
}

impl PlaceholderView {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            title: section.into().to_uppercase(),
        }
    }
}

impl SectionView for PlaceholderView {
    fn tick(&mut self) {}

    fn handle_key(&mut self, _key: KeyEvent) {}

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        render_notice(
            f,
            area,
            &self.title,
            "This section is not configured yet.",
        );
    }

    fn hints(&self) -> &'static str {
        ""
    }
}
