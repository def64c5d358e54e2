//! Project approval view

use super::{SectionView, ViewContext, render_notice};
use crate::context::AppContext;
use crate::panel::ResourcePanel;
use crate::resources::projects::StatusFilter;
use crate::resources::{Project, ProjectStatus};
use crate::ui::components::panel_block;
use crate::ui::utils::{format_date, step_selection};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Row, Table, TableState};

fn status_color(status: &ProjectStatus) -> Color {
    match status {
        ProjectStatus::Approved => Color::Green,
        ProjectStatus::Rejected => Color::Red,
        ProjectStatus::Review | ProjectStatus::Pending => Color::Yellow,
        ProjectStatus::Draft | ProjectStatus::Other(_) => Color::Gray,
    }
}

pub struct ProjectsView {
    panel: ResourcePanel<Project>,
    filter: StatusFilter,
    /// Index into the filtered list.
    selected: usize,
}

impl ProjectsView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            panel: ResourcePanel::mount(ctx),
            filter: StatusFilter::All,
            selected: 0,
        }
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn visible(&self) -> Vec<&Project> {
        self.panel
            .rows()
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    fn set_selected_status(&self, status: ProjectStatus) {
        if let Some(project) = self.visible().get(self.selected) {
            self.panel.set_status(&project.id, &status);
        }
    }
}

impl SectionView for ProjectsView {
    fn tick(&mut self) {
        self.panel.pump();
        self.selected = step_selection(self.selected, self.visible().len(), 0);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let len = self.visible().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step_selection(self.selected, len, -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step_selection(self.selected, len, 1)
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.selected = 0;
            }
            KeyCode::Char('a') => self.set_selected_status(ProjectStatus::Approved),
            KeyCode::Char('x') => self.set_selected_status(ProjectStatus::Rejected),
            KeyCode::Char('r') => self.set_selected_status(ProjectStatus::Review),
            KeyCode::Char('t') => self.set_selected_status(ProjectStatus::Draft),
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let title = format!("PROJECT APPROVAL · filter: {}", self.filter.label());
        if self.panel.is_loading() {
            return render_notice(f, area, &title, "Loading...");
        }
        let visible = self.visible();
        if visible.is_empty() {
            return render_notice(f, area, &title, "No projects match this filter.");
        }

        let rows: Vec<Row> = visible
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.name.clone()),
                    Cell::from(p.channel_name.clone().unwrap_or_default()),
                    Cell::from(p.status.to_string())
                        .style(Style::default().fg(status_color(&p.status))),
                    Cell::from(format_date(p.created_at.as_deref())),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Length(18),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["Project", "Channel", "Status", "Created"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(panel_block(&title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(" > ");
        let mut state = TableState::default().with_selected(Some(self.selected));
        f.render_stateful_widget(table, area, &mut state);
    }

    fn hints(&self) -> &'static str {
        "[A] Approve | [X] Reject | [R] Review | [T] Draft | [F] Filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestHarness, wait_until};
    use crate::ui::views::test_support::{press, render_view};
    use serde_json::json;

    #[tokio::test]
    async fn test_filter_and_approve() {
        let harness = TestHarness::new();
        harness
            .backend
            .seed("projects", json!({ "name": "Bakery", "status": "pending" }));
        harness
            .backend
            .seed("projects", json!({ "name": "Garage", "status": "approved" }));
        let mut view = ProjectsView::new(harness.ctx());
        wait_until(|| {
            view.tick();
            view.visible().len() == 2
        })
        .await;

        press(&mut view, KeyCode::Char('f'));
        press(&mut view, KeyCode::Char('f'));
        assert_eq!(view.filter().label(), "review");
        assert_eq!(view.visible().len(), 1);
        let screen = render_view(&view, 100, 12);
        assert!(screen.contains("Bakery"));
        assert!(screen.contains("review (pending)"));
        assert!(!screen.contains("Garage"));

        press(&mut view, KeyCode::Char('a'));
        wait_until(|| {
            view.tick();
            view.visible().is_empty()
        })
        .await;
        assert_eq!(
            harness.backend.last_patch("projects"),
            Some(json!({ "status": "approved" }))
        );
        assert!(render_view(&view, 100, 12).contains("No projects match this filter."));
    }
}
