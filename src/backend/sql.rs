//! Interpretation of `execute_sql` payloads.
//!
//! The procedure reports SQL failures inside a successful response, as an
//! object with an `error` key. Callers must go through [`SqlOutcome`] rather
//! than trusting the transport status.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use serde_json::{Map, Value};

/// Tabular result of a statement, with every cell rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `index`, if both exist.
    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows
            .get(index)
            .and_then(|row| row.get(position))
            .map(String::as_str)
    }

    /// Plain-text table with padded columns, for terminal output.
    pub fn to_text(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain([column.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(&self.columns)];
        out.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.extend(self.rows.iter().map(|row| line(row)));
        out.join("\n")
    }

    fn from_objects(objects: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).map(render_cell).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }
}

/// What an `execute_sql` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlOutcome {
    Rows(RowSet),
    /// The embedded error message, verbatim.
    Failed(String),
}

impl SqlOutcome {
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::Null => SqlOutcome::Rows(RowSet::default()),
            Value::Array(items) => SqlOutcome::Rows(rows_from_array(items)),
            Value::Object(mut object) => {
                match object.remove("error") {
                    Some(Value::Null) | None => {}
                    Some(error) => return SqlOutcome::Failed(error_text(error)),
                }
                for key in ["rows", "data", "result"] {
                    if let Some(Value::Array(items)) = object.get(key) {
                        return SqlOutcome::Rows(rows_from_array(items.clone()));
                    }
                }
                SqlOutcome::Rows(RowSet::from_objects(vec![object]))
            }
            scalar => SqlOutcome::Rows(RowSet {
                columns: vec!["value".to_string()],
                rows: vec![vec![render_cell(&scalar)]],
            }),
        }
    }

    /// Converts an embedded error into [`BackendError::Procedure`].
    pub fn into_result(self) -> Result<RowSet, BackendError> {
        match self {
            SqlOutcome::Rows(rows) => Ok(rows),
            SqlOutcome::Failed(message) => Err(BackendError::Procedure(message)),
        }
    }
}

/// Runs `sql` and classifies the payload.
pub async fn run_sql(backend: &dyn Backend, sql: &str) -> Result<SqlOutcome, BackendError> {
    let payload = backend.execute_sql(sql).await?;
    Ok(SqlOutcome::from_payload(payload))
}

/// Quotes a value as a SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn rows_from_array(items: Vec<Value>) -> RowSet {
    if items.iter().all(Value::is_object) {
        let objects = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(object),
                _ => None,
            })
            .collect();
        return RowSet::from_objects(objects);
    }
    RowSet {
        columns: vec!["value".to_string()],
        rows: items.iter().map(|item| vec![render_cell(item)]).collect(),
    }
}

fn error_text(error: Value) -> String {
    match error {
        Value::String(message) if message.is_empty() => "Query failed".to_string(),
        Value::String(message) => message,
        Value::Object(ref object) => object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
