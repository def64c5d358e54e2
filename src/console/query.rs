//! Query runner: one statement at a time through `execute_sql`.

use crate::backend::sql::{RowSet, SqlOutcome, run_sql};
use crate::context::AppContext;
use crate::events::Source;
use tokio::sync::mpsc;

/// What the last execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Rows(RowSet),
    /// Error text, shown verbatim in place of a table.
    Failed(String),
}

pub struct QueryConsole {
    ctx: AppContext,
    sql: String,
    running: bool,
    result: Option<QueryResult>,
    sender: mpsc::Sender<QueryResult>,
    receiver: mpsc::Receiver<QueryResult>,
}

impl QueryConsole {
    pub fn new(ctx: AppContext) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        Self {
            ctx,
            sql: String::new(),
            running: false,
            result: None,
            sender,
            receiver,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn set_sql(&mut self, sql: impl Into<String>) {
        self.sql = sql.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.sql.push(c);
    }

    pub fn backspace(&mut self) {
        self.sql.pop();
    }

    pub fn clear(&mut self) {
        self.sql.clear();
        self.result = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    /// Runs the editor contents. Ignored while a run is in flight or the editor is blank.
    pub fn execute(&mut self) {
        let sql = self.sql.trim().to_string();
        if sql.is_empty() || self.running {
            return;
        }
        self.running = true;
        let backend = self.ctx.backend.clone();
        let events = self.ctx.events.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = match run_sql(backend.as_ref(), &sql).await {
                Ok(SqlOutcome::Rows(rows)) => QueryResult::Rows(rows),
                Ok(SqlOutcome::Failed(message)) => QueryResult::Failed(message),
                Err(e) => {
                    events.error(Source::Console, format!("Query failed: {}", e));
                    QueryResult::Failed(e.to_string())
                }
            };
            let _ = sender.send(result).await;
        });
    }

    pub fn pump(&mut self) {
        if let Ok(result) = self.receiver.try_recv() {
            self.running = false;
            self.result = Some(result);
        }
    }
}
