//! Creation form
//!
//! A modal form driven by a resource's [`FieldSpec`] list. Fields with
//! choices cycle with Left/Right; everything else is free text.

use crate::consts::cli_consts::ui::MASK_CHAR;
use crate::resources::{FieldSpec, FieldValues};
use crate::ui::utils::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Keep the form open.
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct FormState {
    title: String,
    fields: &'static [FieldSpec],
    values: FieldValues,
    focus: usize,
    /// Last validation or backend error, shown under the fields.
    error: Option<String>,
    submitting: bool,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: &'static [FieldSpec]) -> Self {
        let mut values = FieldValues::defaults(fields);
        // Choice fields always hold one of their choices.
        for field in fields {
            if !field.choices.is_empty() && values.get(field.key).is_empty() {
                values.set(field.key, field.choices[0]);
            }
        }
        Self {
            title: title.into(),
            fields,
            values,
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Marks the form as waiting for the backend.
    pub fn submitted(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    /// Re-opens the form for editing with the values intact.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }
        let field = self.fields[self.focus];
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len()
            }
            KeyCode::Left | KeyCode::Right if !field.choices.is_empty() => {
                let current = field
                    .choices
                    .iter()
                    .position(|c| *c == self.values.get(field.key))
                    .unwrap_or(0);
                let len = field.choices.len();
                let next = if key.code == KeyCode::Right {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                };
                self.values.set(field.key, field.choices[next]);
            }
            KeyCode::Char(c) if field.choices.is_empty() => {
                if let Some(value) = self.values.get_mut(field.key) {
                    value.push(c);
                }
            }
            KeyCode::Backspace if field.choices.is_empty() => {
                if let Some(value) = self.values.get_mut(field.key) {
                    value.pop();
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn field_line(&self, index: usize, field: &FieldSpec) -> Line<'static> {
        let value = self.values.get(field.key);
        let shown = if field.secret {
            MASK_CHAR.to_string().repeat(value.chars().count())
        } else if !field.choices.is_empty() {
            format!("◀ {} ▶", value)
        } else {
            value.to_string()
        };
        let focused = index == self.focus;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if field.required { "*" } else { " " };
        let cursor = if focused && field.choices.is_empty() { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:>16}{} ", field.label, marker), label_style),
            Span::raw(format!("{}{}", shown, cursor)),
        ])
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let height = self.fields.len() as u16 + 7;
        let rect = centered_rect(64, height, area);

        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| self.field_line(i, field))
            .collect();
        lines.push(Line::from(""));
        lines.push(match (&self.error, self.submitting) {
            (_, true) => Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Yellow),
            )),
            (Some(error), false) => Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )),
            (None, false) => Line::from(Span::styled(
                "[Enter] Save | [Esc] Cancel | [Tab] Next field",
                Style::default().fg(Color::DarkGray),
            )),
        });

        let form = Paragraph::new(lines).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Yellow))
                .padding(Padding::uniform(1)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(form, rect);
    }
}
