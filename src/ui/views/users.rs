//! User management view
//!
//! Accounts come from the auth admin API, which has no change feed, so the
//! list only changes on a manual reload or after a delete.

use super::{SectionView, ViewContext, render_notice};
use crate::context::AppContext;
use crate::events::{EventSender, Source};
use crate::panel::ResourcePanel;
use crate::resources::{AuthUser, Resource};
use crate::ui::components::panel_block;
use crate::ui::utils::{format_date, step_selection};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

pub struct UsersView {
    panel: ResourcePanel<AuthUser>,
    events: EventSender,
    query: String,
    searching: bool,
    selected: usize,
}

impl UsersView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            events: ctx.events.clone(),
            panel: ResourcePanel::mount(ctx),
            query: String::new(),
            searching: false,
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible(&self) -> Vec<&AuthUser> {
        self.panel
            .rows()
            .iter()
            .filter(|u| u.matches(&self.query))
            .collect()
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.searching = false,
            KeyCode::Esc => {
                self.searching = false;
                self.query.clear();
            }
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Char(c) => self.query.push(c),
            _ => {}
        }
        self.selected = 0;
    }
}

impl SectionView for UsersView {
    fn tick(&mut self) {
        self.panel.pump();
        self.selected = step_selection(self.selected, self.visible().len(), 0);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.searching {
            return self.handle_search_key(key);
        }
        let len = self.visible().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step_selection(self.selected, len, -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step_selection(self.selected, len, 1)
            }
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('r') => self.panel.load(),
            KeyCode::Char('i') => self.events.info(
                Source::Panel(AuthUser::LABEL),
                "Invite",
                "Inviting users is not available yet",
            ),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(user) = self.visible().get(self.selected) {
                    self.panel.delete(&user.id);
                }
            }
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Fill(1)])
            .split(area);

        let search_style = if self.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if self.searching { "▏" } else { "" };
        let search = Paragraph::new(format!("/ {}{}", self.query, cursor))
            .style(search_style)
            .block(panel_block("SEARCH"));
        f.render_widget(search, chunks[0]);

        let title = format!("USERS ({})", self.panel.rows().len());
        if self.panel.is_loading() {
            return render_notice(f, chunks[1], &title, "Loading...");
        }
        let visible = self.visible();
        if visible.is_empty() {
            return render_notice(f, chunks[1], &title, "No users found.");
        }

        let rows: Vec<Row> = visible
            .iter()
            .map(|u| {
                let (label, color) = if u.is_confirmed() {
                    ("confirmed", Color::Green)
                } else {
                    ("unconfirmed", Color::Yellow)
                };
                Row::new(vec![
                    Cell::from(u.email.clone().unwrap_or_else(|| "—".to_string())),
                    Cell::from(label).style(Style::default().fg(color)),
                    Cell::from(format_date(u.created_at.as_deref())),
                    Cell::from(format_date(u.last_sign_in_at.as_deref())),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(11),
            ],
        )
        .header(
            Row::new(vec!["Email", "State", "Joined", "Last login"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(panel_block(&title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(" > ");
        let mut state = TableState::default().with_selected(Some(self.selected));
        f.render_stateful_widget(table, chunks[1], &mut state);
    }

    fn hints(&self) -> &'static str {
        if self.searching {
            "[Enter] Done | [Esc] Clear"
        } else {
            "[/] Search | [D] Delete | [I] Invite | [R] Reload"
        }
    }

    fn captures_input(&self) -> bool {
        self.searching
    }
}
