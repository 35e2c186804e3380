//! Document collections.
//!
//! A [`Collection`] stores each record as serialized JSON in a `data`
//! column, alongside a declared set of typed columns that can be indexed
//! and filtered on. Services declare a [`CollectionSpec`] and go through
//! the collection for all reads and writes instead of writing SQL.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::value::Value;
use crate::Store;

/// A declared, filterable column next to the JSON `data` payload.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    /// SQLite type affinity, e.g. "TEXT" or "INTEGER".
    pub sql_type: &'static str,
    /// Create a secondary index on this column.
    pub indexed: bool,
    /// Enforce uniqueness on this column alone.
    pub unique: bool,
}

/// Static description of a collection's table.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    /// Composite unique constraints, each a list of column names.
    pub unique_together: &'static [&'static [&'static str]],
}

/// A filter on a declared column.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    Gte(&'static str, Value),
}

/// Handle to one collection over a shared store.
#[derive(Clone)]
pub struct Collection {
    store: Store,
    spec: &'static CollectionSpec,
}

impl Collection {
    /// Open a collection, creating its table and indexes if missing.
    pub fn open(store: Store, spec: &'static CollectionSpec) -> Result<Self, StoreError> {
        let mut cols = vec!["id TEXT PRIMARY KEY".to_string(), "data TEXT NOT NULL".to_string()];
        for c in spec.columns {
            let unique = if c.unique { " UNIQUE" } else { "" };
            cols.push(format!("{} {}{}", c.name, c.sql_type, unique));
        }
        store.exec(
            &format!("CREATE TABLE IF NOT EXISTS {} ({})", spec.table, cols.join(", ")),
            &[],
        )?;

        for c in spec.columns.iter().filter(|c| c.indexed && !c.unique) {
            store.exec(
                &format!(
                    "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                    spec.table, c.name, spec.table, c.name
                ),
                &[],
            )?;
        }
        for group in spec.unique_together {
            store.exec(
                &format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS uniq_{}_{} ON {}({})",
                    spec.table,
                    group.join("_"),
                    spec.table,
                    group.join(", ")
                ),
                &[],
            )?;
        }

        Ok(Self { store, spec })
    }

    pub fn table(&self) -> &'static str {
        self.spec.table
    }

    /// Insert a record. `indexed` carries values for the declared columns.
    pub fn insert<T: Serialize>(
        &self,
        id: &str,
        record: &T,
        indexed: &[(&str, Value)],
    ) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(record).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];
        for (col, val) in indexed {
            cols.push(col);
            placeholders.push(format!("?{}", params.len() + 1));
            params.push(val.clone());
        }

        self.store.exec(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.spec.table,
                cols.join(", "),
                placeholders.join(", ")
            ),
            &params,
        )?;
        Ok(())
    }

    /// Get a record by id.
    pub fn get<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let rows = self.store.query(
            &format!("SELECT data FROM {} WHERE id = ?1", self.spec.table),
            &[Value::Text(id.to_string())],
        )?;
        match rows.first().and_then(|r| r.get_str("data")) {
            Some(data) => {
                let record =
                    serde_json::from_str(data).map_err(|e| StoreError::Corrupt(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Replace a record's JSON data and indexed columns.
    /// Returns false when no record with this id exists.
    pub fn update<T: Serialize>(
        &self,
        id: &str,
        record: &T,
        indexed: &[(&str, Value)],
    ) -> Result<bool, StoreError> {
        let json =
            serde_json::to_string(record).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];
        for (col, val) in indexed {
            sets.push(format!("{} = ?{}", col, params.len() + 1));
            params.push(val.clone());
        }
        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let affected = self.store.exec(
            &format!("UPDATE {} SET {} WHERE id = ?{}", self.spec.table, sets.join(", "), id_idx),
            &params,
        )?;
        Ok(affected > 0)
    }

    /// Delete a record by id. Returns false when nothing was deleted.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let affected = self.store.exec(
            &format!("DELETE FROM {} WHERE id = ?1", self.spec.table),
            &[Value::Text(id.to_string())],
        )?;
        Ok(affected > 0)
    }

    /// Find the first record matching the filters.
    pub fn find_one<T: DeserializeOwned>(&self, filters: &[Filter]) -> Result<Option<T>, StoreError> {
        let (items, _) = self.list(filters, 1, 0)?;
        Ok(items.into_iter().next())
    }

    /// List records matching the filters, newest first, with a total count.
    pub fn list<T: DeserializeOwned>(
        &self,
        filters: &[Filter],
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<T>, usize), StoreError> {
        let (where_sql, mut params) = build_where(filters);
        let total = self.count_where(&where_sql, &params)?;

        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));

        let rows = self.store.query(
            &format!(
                "SELECT data FROM {}{} ORDER BY {} LIMIT ?{} OFFSET ?{}",
                self.spec.table,
                where_sql,
                self.order_clause(),
                limit_idx,
                offset_idx
            ),
            &params,
        )?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| StoreError::Corrupt("missing data column".into()))?;
            items.push(
                serde_json::from_str(data).map_err(|e| StoreError::Corrupt(e.to_string()))?,
            );
        }
        Ok((items, total))
    }

    /// Count records matching the filters.
    pub fn count(&self, filters: &[Filter]) -> Result<usize, StoreError> {
        let (where_sql, params) = build_where(filters);
        self.count_where(&where_sql, &params)
    }

    fn count_where(&self, where_sql: &str, params: &[Value]) -> Result<usize, StoreError> {
        let rows = self.store.query(
            &format!("SELECT COUNT(*) AS cnt FROM {}{}", self.spec.table, where_sql),
            params,
        )?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize)
    }

    fn order_clause(&self) -> &'static str {
        if self.spec.columns.iter().any(|c| c.name == "created_at") {
            "created_at DESC"
        } else {
            "id"
        }
    }
}

fn build_where(filters: &[Filter]) -> (String, Vec<Value>) {
    if filters.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut clauses = Vec::with_capacity(filters.len());
    let mut params = Vec::new();
    for f in filters {
        match f {
            Filter::Eq(col, val) => {
                params.push(val.clone());
                clauses.push(format!("{} = ?{}", col, params.len()));
            }
            Filter::Gte(col, val) => {
                params.push(val.clone());
                clauses.push(format!("{} >= ?{}", col, params.len()));
            }
            Filter::In(col, vals) => {
                let mut slots = Vec::with_capacity(vals.len());
                for val in vals {
                    params.push(val.clone());
                    slots.push(format!("?{}", params.len()));
                }
                clauses.push(format!("{} IN ({})", col, slots.join(", ")));
            }
        }
    }
    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::sqlite::SqliteStore;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        name: String,
        kind: String,
        created_at: String,
    }

    static WIDGETS: CollectionSpec = CollectionSpec {
        table: "widgets",
        columns: &[
            ColumnDef { name: "name", sql_type: "TEXT", indexed: true, unique: true },
            ColumnDef { name: "kind", sql_type: "TEXT", indexed: true, unique: false },
            ColumnDef { name: "created_at", sql_type: "TEXT", indexed: false, unique: false },
        ],
        unique_together: &[],
    };

    fn collection() -> Collection {
        let store: Store = Arc::new(SqliteStore::open_in_memory().unwrap());
        Collection::open(store, &WIDGETS).unwrap()
    }

    fn widget(id: &str, name: &str, kind: &str, at: &str) -> Widget {
        Widget {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            created_at: at.to_string(),
        }
    }

    fn put(col: &Collection, w: &Widget) -> Result<(), StoreError> {
        col.insert(
            &w.id,
            w,
            &[
                ("name", Value::from(w.name.clone())),
                ("kind", Value::from(w.kind.clone())),
                ("created_at", Value::from(w.created_at.clone())),
            ],
        )
    }

    #[test]
    fn crud_roundtrip() {
        let col = collection();
        let w = widget("w1", "alpha", "small", "2026-01-01T00:00:00+00:00");
        put(&col, &w).unwrap();

        let got: Widget = col.get("w1").unwrap().unwrap();
        assert_eq!(got, w);

        let mut updated = w.clone();
        updated.kind = "large".to_string();
        assert!(col.update("w1", &updated, &[("kind", Value::from("large"))]).unwrap());
        let got: Widget = col.get("w1").unwrap().unwrap();
        assert_eq!(got.kind, "large");

        assert!(col.delete("w1").unwrap());
        assert!(col.get::<Widget>("w1").unwrap().is_none());
        assert!(!col.delete("w1").unwrap());
    }

    #[test]
    fn unique_column_rejects_duplicates() {
        let col = collection();
        put(&col, &widget("w1", "alpha", "small", "2026-01-01T00:00:00+00:00")).unwrap();
        let err = put(&col, &widget("w2", "alpha", "small", "2026-01-02T00:00:00+00:00"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn filters_and_pagination() {
        let col = collection();
        put(&col, &widget("w1", "a", "small", "2026-01-01T00:00:00+00:00")).unwrap();
        put(&col, &widget("w2", "b", "small", "2026-01-02T00:00:00+00:00")).unwrap();
        put(&col, &widget("w3", "c", "large", "2026-01-03T00:00:00+00:00")).unwrap();

        let (items, total): (Vec<Widget>, usize) =
            col.list(&[Filter::Eq("kind", Value::from("small"))], 10, 0).unwrap();
        assert_eq!(total, 2);
        // Newest first.
        assert_eq!(items[0].id, "w2");

        let (items, total): (Vec<Widget>, usize) = col
            .list(
                &[Filter::In("kind", vec![Value::from("small"), Value::from("large")])],
                2,
                1,
            )
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len(), 2);

        let n = col
            .count(&[Filter::Gte("created_at", Value::from("2026-01-02T00:00:00+00:00"))])
            .unwrap();
        assert_eq!(n, 2);

        let found: Option<Widget> =
            col.find_one(&[Filter::Eq("name", Value::from("c"))]).unwrap();
        assert_eq!(found.unwrap().id, "w3");
    }
}
