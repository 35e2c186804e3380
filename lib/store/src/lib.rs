//! Embedded document store.
//!
//! Records are stored as a JSON `data` column plus a handful of declared,
//! indexable columns, on top of bundled SQLite.

pub mod collection;
pub mod error;
pub mod sqlite;
pub mod value;

use std::sync::Arc;

pub use collection::{Collection, CollectionSpec, ColumnDef, Filter};
pub use error::StoreError;
pub use sqlite::SqliteStore;
pub use value::{Row, Value};

/// SQL execution interface backed by an embedded database.
pub trait SQLStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError>;

    /// Execute a statement (INSERT/UPDATE/DELETE/DDL) and return the
    /// affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;
}

/// Shared handle to a store backend.
pub type Store = Arc<dyn SQLStore>;
