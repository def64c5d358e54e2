//! Database catalog: public tables, their change counters and columns.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::backend::sql::{RowSet, quote_literal, run_sql};
use crate::consts::cli_consts::PANEL_QUEUE_SIZE;
use crate::context::AppContext;
use crate::events::Source;
use crate::panel::LoadState;
use tokio::sync::mpsc;

const TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' ORDER BY table_name";

const STATS_SQL: &str = "SELECT relname, n_live_tup, n_tup_ins, n_tup_upd, n_tup_del \
     FROM pg_stat_user_tables WHERE schemaname = 'public' ORDER BY relname";

fn columns_sql(table: &str) -> String {
    format!(
        "SELECT column_name, data_type, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = {} ORDER BY ordinal_position",
        quote_literal(table)
    )
}

/// A public table with its row change counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub live_rows: i64,
    pub inserts: i64,
    pub updates: i64,
    pub deletes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

fn count(rows: &RowSet, index: usize, column: &str) -> i64 {
    rows.cell(index, column)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Table names joined with `pg_stat_user_tables` counters.
pub async fn load_tables(backend: &dyn Backend) -> Result<Vec<TableSummary>, BackendError> {
    let names = run_sql(backend, TABLES_SQL).await?.into_result()?;
    let stats = run_sql(backend, STATS_SQL).await?.into_result()?;

    Ok((0..names.rows.len())
        .filter_map(|i| names.cell(i, "table_name").map(str::to_string))
        .map(|name| {
            let stat = (0..stats.rows.len()).find(|&j| stats.cell(j, "relname") == Some(name.as_str()));
            match stat {
                Some(j) => TableSummary {
                    live_rows: count(&stats, j, "n_live_tup"),
                    inserts: count(&stats, j, "n_tup_ins"),
                    updates: count(&stats, j, "n_tup_upd"),
                    deletes: count(&stats, j, "n_tup_del"),
                    name,
                },
                None => TableSummary {
                    name,
                    ..TableSummary::default()
                },
            }
        })
        .collect())
}

pub async fn load_columns(
    backend: &dyn Backend,
    table: &str,
) -> Result<Vec<ColumnInfo>, BackendError> {
    let rows = run_sql(backend, &columns_sql(table)).await?.into_result()?;
    Ok((0..rows.rows.len())
        .map(|i| ColumnInfo {
            name: rows.cell(i, "column_name").unwrap_or_default().to_string(),
            data_type: rows.cell(i, "data_type").unwrap_or_default().to_string(),
            nullable: rows.cell(i, "is_nullable") == Some("YES"),
            default: rows
                .cell(i, "column_default")
                .filter(|d| !d.is_empty() && *d != "NULL")
                .map(str::to_string),
        })
        .collect())
}

enum CatalogMessage {
    Tables(Result<Vec<TableSummary>, String>),
    Columns(String, Result<Vec<ColumnInfo>, String>),
}

/// Catalog state behind the Database section. Refreshed on demand only.
pub struct DatabaseCatalog {
    ctx: AppContext,
    tables: Vec<TableSummary>,
    columns: Option<(String, Vec<ColumnInfo>)>,
    state: LoadState,
    sender: mpsc::Sender<CatalogMessage>,
    receiver: mpsc::Receiver<CatalogMessage>,
}

impl DatabaseCatalog {
    pub fn new(ctx: AppContext) -> Self {
        let (sender, receiver) = mpsc::channel(PANEL_QUEUE_SIZE);
        Self {
            ctx,
            tables: Vec::new(),
            columns: None,
            state: LoadState::Loading,
            sender,
            receiver,
        }
    }

    pub fn mount(ctx: AppContext) -> Self {
        let catalog = Self::new(ctx);
        catalog.refresh();
        catalog
    }

    pub fn tables(&self) -> &[TableSummary] {
        &self.tables
    }

    /// Columns of the last table that was opened.
    pub fn columns(&self) -> Option<(&str, &[ColumnInfo])> {
        self.columns
            .as_ref()
            .map(|(table, columns)| (table.as_str(), columns.as_slice()))
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn refresh(&self) {
        let backend = self.ctx.backend.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = load_tables(backend.as_ref())
                .await
                .map_err(|e| e.to_string());
            let _ = sender.send(CatalogMessage::Tables(result)).await;
        });
    }

    pub fn open_table(&self, table: &str) {
        let backend = self.ctx.backend.clone();
        let sender = self.sender.clone();
        let table = table.to_string();
        tokio::spawn(async move {
            let result = load_columns(backend.as_ref(), &table)
                .await
                .map_err(|e| e.to_string());
            let _ = sender.send(CatalogMessage::Columns(table, result)).await;
        });
    }

    pub fn pump(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                CatalogMessage::Tables(Ok(tables)) => {
                    self.tables = tables;
                    self.state = LoadState::Ready;
                }
                CatalogMessage::Tables(Err(e)) => {
                    self.state = LoadState::Ready;
                    self.ctx
                        .events
                        .error(Source::Console, format!("Failed to read catalog: {}", e));
                }
                CatalogMessage::Columns(table, Ok(columns)) => {
                    self.columns = Some((table, columns));
                }
                CatalogMessage::Columns(table, Err(e)) => {
                    self.ctx.events.error(
                        Source::Console,
                        format!("Failed to read columns of {}: {}", table, e),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestHarness, wait_until};
    use serde_json::json;

    fn seed_catalog(harness: &TestHarness) {
        harness.backend.respond_to_sql(
            "information_schema.tables",
            json!([{"table_name": "ai_api_keys"}, {"table_name": "projects"}]),
        );
        harness.backend.respond_to_sql(
            "pg_stat_user_tables",
            json!([{
                "relname": "projects",
                "n_live_tup": 4, "n_tup_ins": 6, "n_tup_upd": 3, "n_tup_del": 2
            }]),
        );
    }

    #[test]
    fn test_columns_sql_escapes_table_name() {
        assert!(columns_sql("bad'name").contains("table_name = 'bad''name'"));
    }

    #[tokio::test]
    async fn test_tables_are_joined_with_stats() {
        let harness = TestHarness::new();
        seed_catalog(&harness);

        let tables = load_tables(harness.backend.as_ref()).await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "ai_api_keys");
        assert_eq!(tables[0].live_rows, 0);
        assert_eq!(
            tables[1],
            TableSummary {
                name: "projects".to_string(),
                live_rows: 4,
                inserts: 6,
                updates: 3,
                deletes: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_embedded_error_fails_the_load() {
        let harness = TestHarness::new();
        harness.backend.respond_to_sql(
            "information_schema.tables",
            json!({"error": "permission denied for schema information_schema"}),
        );
        let err = load_tables(harness.backend.as_ref()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "permission denied for schema information_schema"
        );
    }

    #[tokio::test]
    async fn test_catalog_refresh_and_open_table() {
        let harness = TestHarness::new();
        seed_catalog(&harness);
        harness.backend.respond_to_sql(
            "information_schema.columns",
            json!([
                {"column_name": "id", "data_type": "uuid", "is_nullable": "NO",
                 "column_default": "gen_random_uuid()"},
                {"column_name": "description", "data_type": "text", "is_nullable": "YES",
                 "column_default": null}
            ]),
        );

        let mut catalog = DatabaseCatalog::mount(harness.ctx());
        assert!(catalog.is_loading());
        wait_until(|| {
            catalog.pump();
            !catalog.is_loading()
        })
        .await;
        assert_eq!(catalog.tables().len(), 2);

        catalog.open_table("projects");
        wait_until(|| {
            catalog.pump();
            catalog.columns().is_some()
        })
        .await;
        let (table, columns) = catalog.columns().unwrap();
        assert_eq!(table, "projects");
        assert_eq!(columns[0].default.as_deref(), Some("gen_random_uuid()"));
        assert!(!columns[0].nullable);
        assert!(columns[1].nullable);
        assert_eq!(columns[1].default, None);
        assert!(
            harness
                .backend
                .executed_sql()
                .iter()
                .any(|sql| sql.contains("table_name = 'projects'"))
        );
    }
}
