//! Database catalog view

use super::{SectionView, ViewContext, render_notice};
use crate::console::DatabaseCatalog;
use crate::context::AppContext;
use crate::ui::components::panel_block;
use crate::ui::utils::step_selection;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Row, Table, TableState};

pub struct DatabaseView {
    catalog: DatabaseCatalog,
    selected: usize,
}

impl DatabaseView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            catalog: DatabaseCatalog::mount(ctx),
            selected: 0,
        }
    }

    pub fn catalog(&self) -> &DatabaseCatalog {
        &self.catalog
    }

    fn render_tables(&self, f: &mut Frame, area: Rect) {
        const TITLE: &str = "TABLES";
        if self.catalog.is_loading() {
            return render_notice(f, area, TITLE, "Loading...");
        }
        if self.catalog.tables().is_empty() {
            return render_notice(f, area, TITLE, "No public tables.");
        }
        let rows: Vec<Row> = self
            .catalog
            .tables()
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.name.clone()),
                    Cell::from(t.live_rows.to_string()),
                    Cell::from(format!("+{}", t.inserts)).style(Style::default().fg(Color::Green)),
                    Cell::from(format!("~{}", t.updates)).style(Style::default().fg(Color::Yellow)),
                    Cell::from(format!("-{}", t.deletes)).style(Style::default().fg(Color::Red)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(8),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(
            Row::new(vec!["Table", "Rows", "Ins", "Upd", "Del"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(panel_block(TITLE))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(" > ");
        let mut state = TableState::default().with_selected(Some(self.selected));
        f.render_stateful_widget(table, area, &mut state);
    }

    fn render_columns(&self, f: &mut Frame, area: Rect) {
        let Some((table, columns)) = self.catalog.columns() else {
            return render_notice(f, area, "COLUMNS", "Press [Enter] to inspect a table.");
        };
        let title = format!("COLUMNS · {}", table);
        let rows: Vec<Row> = columns
            .iter()
            .map(|c| {
                Row::new(vec![
                    Cell::from(c.name.clone()),
                    Cell::from(c.data_type.clone()),
                    Cell::from(if c.nullable { "null" } else { "not null" }),
                    Cell::from(c.default.clone().unwrap_or_default())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        let widget = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Length(8),
                Constraint::Fill(1),
            ],
        )
        .header(
            Row::new(vec!["Column", "Type", "Null", "Default"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(panel_block(&title));
        f.render_widget(widget, area);
    }
}

impl SectionView for DatabaseView {
    fn tick(&mut self) {
        self.catalog.pump();
        self.selected = step_selection(self.selected, self.catalog.tables().len(), 0);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let len = self.catalog.tables().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = step_selection(self.selected, len, -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = step_selection(self.selected, len, 1)
            }
            KeyCode::Enter => {
                if let Some(table) = self.catalog.tables().get(self.selected) {
                    self.catalog.open_table(&table.name);
                }
            }
            KeyCode::Char('r') => self.catalog.refresh(),
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        self.render_tables(f, chunks[0]);
        self.render_columns(f, chunks[1]);
    }

    fn hints(&self) -> &'static str {
        "[Enter] Columns | [R] Refresh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestHarness, wait_until};
    use crate::ui::views::test_support::{press, render_view};
    use serde_json::json;

    #[tokio::test]
    async fn test_open_selected_table_shows_columns() {
        let harness = TestHarness::new();
        harness.backend.respond_to_sql(
            "information_schema.tables",
            json!([{"table_name": "github_tokens"}, {"table_name": "projects"}]),
        );
        harness.backend.respond_to_sql(
            "information_schema.columns",
            json!([{"column_name": "status", "data_type": "text", "is_nullable": "NO"}]),
        );
        let mut view = DatabaseView::new(harness.ctx());
        wait_until(|| {
            view.tick();
            view.catalog().tables().len() == 2
        })
        .await;
        assert!(render_view(&view, 120, 12).contains("Press [Enter] to inspect a table."));

        press(&mut view, KeyCode::Down);
        press(&mut view, KeyCode::Enter);
        wait_until(|| {
            view.tick();
            view.catalog().columns().is_some()
        })
        .await;

        let screen = render_view(&view, 120, 12);
        assert!(screen.contains("COLUMNS · projects"));
        assert!(screen.contains("not null"));
        assert!(
            harness
                .backend
                .executed_sql()
                .iter()
                .any(|sql| sql.contains("table_name = 'projects'"))
        );
    }
}
