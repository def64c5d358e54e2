//! Backend-as-a-service surface: tables, remote procedures and auth admin.

use crate::backend::error::BackendError;
use crate::environment::Environment;
use serde_json::Value;

pub(crate) mod client;
pub use client::BackendClient;
pub mod error;
pub mod sql;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetches every row of a table, sorted descending by `order_by`.
    async fn select_all(&self, table: &str, order_by: &str) -> Result<Vec<Value>, BackendError>;

    /// Inserts one row. The backend assigns `id` and timestamps.
    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError>;

    /// Patches the row with the given primary key.
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), BackendError>;

    /// Deletes the row with the given primary key.
    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError>;

    /// Asks the backend for a collision-free name for a new credential.
    async fn generate_unique_provider_name(
        &self,
        provider_type: &str,
    ) -> Result<String, BackendError>;

    /// Runs a statement through the `execute_sql` procedure and returns its raw payload.
    ///
    /// An `error` key inside the payload is NOT turned into an `Err` here; see
    /// [`sql::SqlOutcome`].
    async fn execute_sql(&self, sql_query: &str) -> Result<Value, BackendError>;

    /// Asks the backend to re-probe its services and refresh `system_status`.
    async fn update_system_status(&self) -> Result<(), BackendError>;

    /// Lists users known to the auth service.
    async fn list_users(&self) -> Result<Vec<Value>, BackendError>;

    /// Deletes a user from the auth service.
    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError>;
}
