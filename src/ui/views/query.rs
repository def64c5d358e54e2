//! Query runner view
//!
//! The editor has focus when the section opens. [Esc] releases it so the
//! portal shortcuts work again.

use super::{SectionView, ViewContext, render_notice};
use crate::console::QueryConsole;
use crate::console::query::QueryResult;
use crate::context::AppContext;
use crate::ui::components::panel_block;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Row, Table, Wrap};

pub struct QueryView {
    console: QueryConsole,
    editing: bool,
}

impl QueryView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            console: QueryConsole::new(ctx),
            editing: true,
        }
    }

    pub fn console(&self) -> &QueryConsole {
        &self.console
    }

    fn render_result(&self, f: &mut Frame, area: Rect) {
        const TITLE: &str = "RESULT";
        match self.console.result() {
            _ if self.console.is_running() => render_notice(f, area, TITLE, "Running..."),
            None => render_notice(f, area, TITLE, "Run a query to see its rows."),
            Some(QueryResult::Failed(message)) => {
                let error = Paragraph::new(message.clone())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: false })
                    .block(panel_block("ERROR"));
                f.render_widget(error, area);
            }
            Some(QueryResult::Rows(rows)) if rows.is_empty() => {
                render_notice(f, area, TITLE, "Query returned no rows.")
            }
            Some(QueryResult::Rows(rows)) => {
                let widths = vec![Constraint::Fill(1); rows.columns.len()];
                let title = format!("RESULT ({} rows)", rows.rows.len());
                let table = Table::new(
                    rows.rows.iter().map(|r| Row::new(r.iter().map(String::as_str))),
                    widths,
                )
                .header(
                    Row::new(rows.columns.iter().map(String::as_str))
                        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                )
                .block(panel_block(&title));
                f.render_widget(table, area);
            }
        }
    }
}

impl SectionView for QueryView {
    fn tick(&mut self) {
        self.console.pump();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.editing {
            match key.code {
                KeyCode::Enter => self.console.execute(),
                KeyCode::Esc => self.editing = false,
                KeyCode::Backspace => self.console.backspace(),
                KeyCode::Char(c) => self.console.push_char(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.console.execute(),
            KeyCode::Char('e') | KeyCode::Char('i') => self.editing = true,
            KeyCode::Char('c') => self.console.clear(),
            _ => {}
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Fill(1)])
            .split(area);

        let (style, cursor) = if self.editing {
            (Style::default().fg(Color::Yellow), "▏")
        } else {
            (Style::default().fg(Color::Gray), "")
        };
        let editor = Paragraph::new(format!("{}{}", self.console.sql(), cursor))
            .style(style)
            .block(panel_block("SQL"));
        f.render_widget(editor, chunks[0]);
        self.render_result(f, chunks[1]);
    }

    fn hints(&self) -> &'static str {
        if self.editing {
            "[Enter] Run | [Esc] Stop editing"
        } else {
            "[Enter] Run | [E] Edit | [C] Clear"
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestHarness, wait_until};
    use crate::ui::views::test_support::{press, render_view, type_text};
    use serde_json::json;

    #[tokio::test]
    async fn test_division_by_zero_renders_error_verbatim() {
        let harness = TestHarness::new();
        harness
            .backend
            .respond_to_sql("SELECT 1/0", json!({"error": "division by zero"}));
        let mut view = QueryView::new(harness.ctx());
        assert!(view.captures_input());

        type_text(&mut view, "SELECT 1/0");
        press(&mut view, KeyCode::Enter);
        wait_until(|| {
            view.tick();
            view.console().result().is_some()
        })
        .await;

        let screen = render_view(&view, 80, 12);
        assert!(screen.contains("ERROR"));
        assert!(screen.contains("division by zero"));
        assert!(!screen.contains("RESULT"));
    }

    #[tokio::test]
    async fn test_rows_render_as_table_and_esc_releases_focus() {
        let harness = TestHarness::new();
        harness.backend.respond_to_sql(
            "FROM projects",
            json!([{"name": "Bakery", "status": "draft"}]),
        );
        let mut view = QueryView::new(harness.ctx());
        type_text(&mut view, "SELECT name, status FROM projects");
        press(&mut view, KeyCode::Enter);
        wait_until(|| {
            view.tick();
            view.console().result().is_some()
        })
        .await;

        let screen = render_view(&view, 80, 12);
        assert!(screen.contains("RESULT (1 rows)"));
        assert!(screen.contains("Bakery"));

        press(&mut view, KeyCode::Esc);
        assert!(!view.captures_input());
        press(&mut view, KeyCode::Char('c'));
        assert_eq!(view.console().sql(), "");
    }
}
