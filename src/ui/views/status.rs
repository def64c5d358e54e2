//! Service health views
//!
//! [`StatusView`] is the Monitoring section (and the Creator portal's
//! Service Status section). [`OverviewView`] pairs a compact health summary
//! with the session's activity log.

use super::{SectionView, ViewContext, render_notice};
use crate::context::AppContext;
use crate::panel::ResourcePanel;
use crate::resources::ServiceStatus;
use crate::ui::components::{panel_block, render_activity_log};
use crate::ui::utils::{enabled_color, format_compact_timestamp};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};

fn status_table(rows: &[ServiceStatus], title: &'static str) -> Table<'static> {
    let rows: Vec<Row> = rows
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.service.clone()),
                Cell::from(if s.status { "up" } else { "down" })
                    .style(Style::default().fg(enabled_color(s.status))),
                Cell::from(
                    s.response_time
                        .map(|ms| format!("{:.0} ms", ms))
                        .unwrap_or_else(|| "—".to_string()),
                ),
                Cell::from(
                    s.last_checked
                        .as_deref()
                        .map(format_compact_timestamp)
                        .unwrap_or_else(|| "never".to_string()),
                ),
                Cell::from(s.error_message.clone().unwrap_or_default())
                    .style(Style::default().fg(Color::Red)),
            ])
        })
        .collect();
    Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(vec!["Service", "State", "Latency", "Checked", "Error"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block(title))
}

pub struct StatusView {
    panel: ResourcePanel<ServiceStatus>,
}

impl StatusView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            panel: ResourcePanel::mount(ctx),
        }
    }

    pub fn panel(&self) -> &ResourcePanel<ServiceStatus> {
        &self.panel
    }
}

impl SectionView for StatusView {
    fn tick(&mut self) {
        self.panel.pump();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('r') {
            self.panel.request_health_check();
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, _view_ctx: &ViewContext) {
        const TITLE: &str = "SERVICE STATUS";
        if self.panel.is_loading() {
            render_notice(f, area, TITLE, "Loading...");
        } else if self.panel.rows().is_empty() {
            render_notice(f, area, TITLE, "No services have been checked yet.");
        } else {
            f.render_widget(status_table(self.panel.rows(), TITLE), area);
        }
    }

    fn hints(&self) -> &'static str {
        "[R] Run health check"
    }
}

pub struct OverviewView {
    panel: ResourcePanel<ServiceStatus>,
}

impl OverviewView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            panel: ResourcePanel::mount(ctx),
        }
    }

    fn summary(&self) -> Paragraph<'static> {
        let rows = self.panel.rows();
        let up = rows.iter().filter(|s| s.status).count();
        let (headline, color) = if self.panel.is_loading() {
            ("Checking services...".to_string(), Color::DarkGray)
        } else if rows.is_empty() {
            ("No health data yet".to_string(), Color::DarkGray)
        } else if up == rows.len() {
            (format!("All systems operational ({} services)", up), Color::Green)
        } else {
            (
                format!("{} of {} services down", rows.len() - up, rows.len()),
                Color::Red,
            )
        };

        let mut lines = vec![Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(rows.iter().map(|s| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(enabled_color(s.status))),
                Span::raw(s.service.clone()),
            ])
        }));
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel_block("SYSTEM HEALTH"))
    }
}

impl SectionView for OverviewView {
    fn tick(&mut self) {
        self.panel.pump();
    }

    fn handle_key(&mut self, _key: KeyEvent) {}

    fn render(&self, f: &mut Frame, area: Rect, view_ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        f.render_widget(self.summary(), chunks[0]);
        render_activity_log(f, chunks[1], view_ctx.activity);
    }

    fn hints(&self) -> &'static str {
        ""
    }
}
