//! Credential view
//!
//! One list of stored secrets (AI keys, YouTube keys, GitHub tokens or
//! Netlify keys) with its creation form.

use super::{SectionView, ViewContext, render_notice};
use crate::context::AppContext;
use crate::panel::{PanelNotice, ResourcePanel};
use crate::resources::{Credential, Draft};
use crate::ui::components::{FormAction, FormState, panel_block};
use crate::ui::utils::{enabled_color, format_usage, step_selection};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table, TableState};
use std::marker::PhantomData;

pub struct CredentialView<R: Credential, D: Draft<Target = R>> {
    title: &'static str,
    panel: ResourcePanel<R>,
    selected: usize,
    form: Option<FormState>,
    _draft: PhantomData<D>,
}

impl<R: Credential, D: Draft<Target = R>> CredentialView<R, D> {
    pub fn new(title: &'static str, ctx: AppContext) -> Self {
        Self {
            title,
            panel: ResourcePanel::mount(ctx),
            selected: 0,
            form: None,
            _draft: PhantomData,
        }
    }

    pub fn panel(&self) -> &ResourcePanel<R> {
        &self.panel
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    fn selected_row(&self) -> Option<&R> {
        self.panel.rows().get(self.selected)
    }

    fn submit(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match self.panel.create::<D>(form.values()) {
            Ok(()) => form.submitted(),
            Err(e) => form.failed(e.to_string()),
        }
    }

    fn row_cells(&self, row: &R) -> Row<'static> {
        let (used, limit) = row.usage();
        let mut name = vec![Line::from(row.display_name().to_string())];
        let details = row.details();
        if !details.is_empty() {
            name.push(Line::from(Span::styled(
                details.join(" · "),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let status = if row.enabled() { "enabled" } else { "disabled" };
        Row::new(vec![
            Cell::from(name),
            Cell::from(self.panel.displayed_secret(row)),
            Cell::from(status).style(Style::default().fg(enabled_color(row.enabled()))),
            Cell::from(format_usage(used, limit)),
        ])
        .height(if details.is_empty() { 1 } else { 2 })
    }
}

impl<R: Credential, D: Draft<Target = R>> SectionView for CredentialView<R, D> {
    fn tick(&mut self) {
        for notice in self.panel.pump() {
            match notice {
                PanelNotice::Created => self.form = None,
                PanelNotice::CreateFailed(message) => {
                    if let Some(form) = self.form.as_mut() {
                        form.failed(message);
                    }
                }
            }
        }
        self.selected = step_selection(self.selected, self.panel.rows().len(), 0);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(form) = self.form.as_mut() {
            match form.handle_key(key) {
                FormAction::Submit => self.submit(),
                FormAction::Cancel => self.form = None,
                FormAction::None => {}
            }
            return;
        }

        let len = self.panel.rows().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step_selection(self.selected, len, -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step_selection(self.selected, len, 1)
            }
            KeyCode::Char('a') => {
                self.form = Some(FormState::new(format!("Add {}", R::LABEL), D::FIELDS))
            }
            KeyCode::Char('r') => self.panel.load(),
            _ => {
                let Some(row) = self.selected_row() else {
                    return;
                };
                let id = row.id().to_string();
                let enabled = row.enabled();
                match key.code {
                    KeyCode::Char('e') | KeyCode::Char(' ') => {
                        self.panel.toggle_enabled(&id, !enabled)
                    }
                    KeyCode::Char('d') | KeyCode::Delete => self.panel.delete(&id),
                    KeyCode::Char('v') => self.panel.toggle_visibility(&id),
                    KeyCode::Char('c') => self.panel.copy_secret(&id),
                    _ => {}
                }
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        if self.panel.is_loading() {
            render_notice(f, area, self.title, "Loading...");
        } else if self.panel.rows().is_empty() {
            render_notice(
                f,
                area,
                self.title,
                &format!("No {}s yet. Press [A] to add one.", R::SECRET_NOUN.to_lowercase()),
            );
        } else {
            let header = Row::new(vec!["Name", R::SECRET_NOUN, "Status", "Usage"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
            let rows: Vec<Row> = self.panel.rows().iter().map(|r| self.row_cells(r)).collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(35),
                    Constraint::Percentage(40),
                    Constraint::Length(9),
                    Constraint::Length(14),
                ],
            )
            .header(header)
            .block(panel_block(self.title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(" > ");
            let mut state = TableState::default().with_selected(Some(self.selected));
            f.render_stateful_widget(table, area, &mut state);
        }

        if let Some(form) = &self.form {
            form.render(f, area);
        }
    }

    fn hints(&self) -> &'static str {
        if self.form.is_some() {
            "[Enter] Save | [Esc] Cancel"
        } else {
            "[A] Add | [E] Enable/Disable | [V] Show | [C] Copy | [D] Delete"
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }
}
