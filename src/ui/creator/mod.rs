//! Creator portal
//!
//! A chat workspace, a preview pane and the service status list. The header
//! reports the health of the services site generation depends on.

mod renderer;

pub use renderer::render_creator;

use crate::context::AppContext;
use crate::panel::ResourcePanel;
use crate::resources::ServiceStatus;
use crate::resources::system_status::is_up;
use crate::ui::views::{SectionView, StatusView, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use strum::IntoEnumIterator;

use crate::ui::components::panel_block;

pub const GREETING: &str =
    "Hi! I'm ready to help you build your website. What's your YouTube channel URL?";
pub const ACKNOWLEDGEMENT: &str =
    "Great! I'm analyzing your channel and building your website...";

/// Services shown in the header, in order.
pub const HEADER_SERVICES: [&str; 3] = ["youtube", "openai", "github"];

const CODE_SAMPLE: &str = r#"// Your generated code will appear here
import React from 'react';

const YourWebsite = () => {
  return (
    <div className="min-h-screen bg-white">
      <h1>Your YouTube Website</h1>
      {/* AI-generated content */}
    </div>
  );
};

export default YourWebsite;"#;

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum CreatorSection {
    Workspace,
    Preview,
    #[strum(serialize = "Service Status")]
    ServiceStatus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Speaker {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// Local conversation with the site assistant. Nothing leaves the client.
pub struct WorkspaceView {
    messages: Vec<ChatMessage>,
    input: String,
    editing: bool,
}

impl Default for WorkspaceView {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                speaker: Speaker::Assistant,
                text: GREETING.to_string(),
            }],
            input: String::new(),
            editing: true,
        }
    }
}

impl WorkspaceView {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends the typed message and the assistant's reply. Blank input is ignored.
    pub fn send(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text,
        });
        self.messages.push(ChatMessage {
            speaker: Speaker::Assistant,
            text: ACKNOWLEDGEMENT.to_string(),
        });
        self.input.clear();
    }
}

impl SectionView for WorkspaceView {
    fn tick(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent) {
        match (self.editing, key.code) {
            (true, KeyCode::Enter) => self.send(),
            (true, KeyCode::Esc) => self.editing = false,
            (true, KeyCode::Backspace) => {
                self.input.pop();
            }
            (true, KeyCode::Char(c)) => self.input.push(c),
            (false, KeyCode::Char('i')) | (false, KeyCode::Enter) => self.editing = true,
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(3)])
            .split(area);

        let lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|m| {
                let (who, color, alignment) = match m.speaker {
                    Speaker::Assistant => ("Assistant", Color::Cyan, Alignment::Left),
                    Speaker::User => ("You", Color::LightBlue, Alignment::Right),
                };
                [
                    Line::from(Span::styled(
                        who,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                    .alignment(alignment),
                    Line::from(m.text.clone()).alignment(alignment),
                    Line::from(""),
                ]
            })
            .collect();
        // Keep the newest messages in view
        let overflow = (lines.len() as u16).saturating_sub(chunks[0].height.saturating_sub(2));
        let chat = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((overflow, 0))
            .block(panel_block("AI ASSISTANT"));
        f.render_widget(chat, chunks[0]);

        let (style, text) = if self.editing {
            (Style::default().fg(Color::Yellow), format!("{}▏", self.input))
        } else if self.input.is_empty() {
            (
                Style::default().fg(Color::DarkGray),
                "Describe your website idea or paste your YouTube channel URL...".to_string(),
            )
        } else {
            (Style::default().fg(Color::Gray), self.input.clone())
        };
        f.render_widget(
            Paragraph::new(text).style(style).block(panel_block("MESSAGE")),
            chunks[1],
        );
    }

    fn hints(&self) -> &'static str {
        if self.editing {
            "[Enter] Send | [Esc] Stop typing"
        } else {
            "[I] Type a message"
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    Live,
    Code,
}

#[derive(Default)]
pub struct PreviewView {
    mode: PreviewMode,
}

impl PreviewView {
    pub fn mode(&self) -> PreviewMode {
        self.mode
    }
}

impl SectionView for PreviewView {
    fn tick(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') => self.mode = PreviewMode::Live,
            KeyCode::Char('c') => self.mode = PreviewMode::Code,
            KeyCode::Char(' ') => {
                self.mode = match self.mode {
                    PreviewMode::Live => PreviewMode::Code,
                    PreviewMode::Code => PreviewMode::Live,
                }
            }
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let preview = match self.mode {
            PreviewMode::Live => Paragraph::new(vec![
                Line::from(""),
                Line::from("📱"),
                Line::from(""),
                Line::from(Span::styled(
                    "Your website preview will appear here once you start chatting with the AI assistant.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel_block("LIVE PREVIEW")),
            PreviewMode::Code => Paragraph::new(CODE_SAMPLE)
                .style(Style::default().fg(Color::Green))
                .block(panel_block("CODE")),
        };
        f.render_widget(preview, area);
    }

    fn hints(&self) -> &'static str {
        "[L] Live | [C] Code | [Space] Toggle"
    }
}

pub struct CreatorState {
    ctx: AppContext,
    section: CreatorSection,
    view: Box<dyn SectionView>,
    /// Feeds the header indicators in every section.
    services: ResourcePanel<ServiceStatus>,
}

impl CreatorState {
    pub fn new(ctx: AppContext) -> Self {
        let section = CreatorSection::Workspace;
        Self {
            view: Self::mount(section, &ctx),
            services: ResourcePanel::mount(ctx.clone()),
            ctx,
            section,
        }
    }

    fn mount(section: CreatorSection, ctx: &AppContext) -> Box<dyn SectionView> {
        match section {
            CreatorSection::Workspace => Box::new(WorkspaceView::default()),
            CreatorSection::Preview => Box::new(PreviewView::default()),
            CreatorSection::ServiceStatus => Box::new(StatusView::new(ctx.clone())),
        }
    }

    pub fn section(&self) -> CreatorSection {
        self.section
    }

    pub fn view(&self) -> &dyn SectionView {
        self.view.as_ref()
    }

    pub fn select(&mut self, section: CreatorSection) {
        if section == self.section {
            return;
        }
        self.section = section;
        self.view = Self::mount(section, &self.ctx);
    }

    fn step(&mut self, delta: isize) {
        let sections: Vec<CreatorSection> = CreatorSection::iter().collect();
        let current = sections.iter().position(|s| *s == self.section).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(sections.len() as isize) as usize;
        self.select(sections[next]);
    }

    pub fn next_section(&mut self) {
        self.step(1);
    }

    pub fn previous_section(&mut self) {
        self.step(-1);
    }

    /// Health of each header service; `None` when it has not been probed.
    pub fn service_health(&self) -> Vec<(&'static str, Option<bool>)> {
        HEADER_SERVICES
            .iter()
            .map(|service| (*service, is_up(self.services.rows(), service)))
            .collect()
    }

    pub fn tick(&mut self) {
        self.services.pump();
        self.view.tick();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.view.handle_key(key);
    }

    pub fn captures_input(&self) -> bool {
        self.view.captures_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestHarness, wait_until};
    use crate::ui::views::test_support::{press, render_view, type_text};
    use serde_json::json;

    #[test]
    fn test_chat_replies_with_acknowledgement() {
        let mut view = WorkspaceView::default();
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].text, GREETING);

        press(&mut view, KeyCode::Enter);
        assert_eq!(view.messages().len(), 1);

        type_text(&mut view, "https://youtube.com/@bakery");
        press(&mut view, KeyCode::Enter);
        let messages = view.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].speaker, Speaker::User);
        assert_eq!(messages[1].text, "https://youtube.com/@bakery");
        assert_eq!(messages[2].text, ACKNOWLEDGEMENT);

        let screen = render_view(&view, 100, 20);
        assert!(screen.contains("Great! I'm analyzing your channel"));
    }

    #[test]
    fn test_preview_toggles_between_live_and_code() {
        let mut view = PreviewView::default();
        assert_eq!(view.mode(), PreviewMode::Live);
        assert!(render_view(&view, 100, 20).contains("LIVE PREVIEW"));

        press(&mut view, KeyCode::Char(' '));
        assert_eq!(view.mode(), PreviewMode::Code);
        assert!(render_view(&view, 100, 20).contains("Your YouTube Website"));

        press(&mut view, KeyCode::Char('l'));
        assert_eq!(view.mode(), PreviewMode::Live);
    }

    #[tokio::test]
    async fn test_header_health_follows_system_status() {
        let harness = TestHarness::new();
        harness
            .backend
            .seed("system_status", json!({ "service": "YouTube API", "status": true }));
        harness
            .backend
            .seed("system_status", json!({ "service": "GitHub", "status": false }));
        let mut state = CreatorState::new(harness.ctx());
        wait_until(|| {
            state.tick();
            state.service_health()[0].1.is_some()
        })
        .await;

        assert_eq!(
            state.service_health(),
            vec![("youtube", Some(true)), ("openai", None), ("github", Some(false))]
        );

        state.previous_section();
        assert_eq!(state.section(), CreatorSection::ServiceStatus);
        assert_eq!(harness.feed.active_subscriptions("system_status"), 2);
    }
}
