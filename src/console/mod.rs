//! SQL-backed developer tools: the database catalog and the query runner.
//!
//! Both talk to the backend only through `execute_sql`.

pub mod catalog;
pub mod query;

pub use catalog::DatabaseCatalog;
pub use query::QueryConsole;
