use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::StoreError;
use crate::value::{Row, Value};
use crate::SQLStore;

/// SQLStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Connection(e.to_string()))?;

        // WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn to_sqlite(v: &Value) -> rusqlite::types::Value {
    match v {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

fn from_sqlite(v: ValueRef) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Map a rusqlite error, detecting unique-constraint violations so the
/// collection layer can report duplicates as such.
fn map_exec_err(e: rusqlite::Error) -> StoreError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint") {
        StoreError::Duplicate(msg)
    } else {
        StoreError::Execution(msg)
    }
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError::Query(e.to_string()))?;

        let mut stmt = conn.prepare(sql).map_err(|e| StoreError::Query(e.to_string()))?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();

        let bound: Vec<rusqlite::types::Value> = params.iter().map(to_sqlite).collect();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bound), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), from_sqlite(row.get_ref(i)?)));
                }
                Ok(Row { columns })
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| StoreError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError::Execution(e.to_string()))?;

        let bound: Vec<rusqlite::types::Value> = params.iter().map(to_sqlite).collect();
        let affected = conn
            .execute(sql, rusqlite::params_from_iter(bound))
            .map_err(map_exec_err)?;

        Ok(affected as u64)
    }
}
