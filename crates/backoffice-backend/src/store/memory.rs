//! In-process record store.
//!
//! Keeps every table as a vector of JSON rows and broadcasts inserts so an
//! in-process change feed can deliver them. Used for offline runs and as
//! the backend in tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use dashmap::{DashMap, DashSet};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::RecordStore;
use backoffice_core::types::{FilterField, SelectQuery, SortDirection};

/// A row inserted into a table.
#[derive(Debug, Clone)]
pub struct InsertEvent {
    /// Table the row was inserted into.
    pub table: String,
    /// The stored row.
    pub row: Value,
}

/// In-memory record store with insert broadcast.
#[derive(Debug)]
pub struct MemoryRecordStore {
    tables: DashMap<String, Vec<Value>>,
    defaults: DashMap<String, Map<String, Value>>,
    failing_reads: DashSet<String>,
    failing_writes: DashSet<String>,
    inserts: broadcast::Sender<InsertEvent>,
}

impl MemoryRecordStore {
    /// Create an empty store; `capacity` bounds the insert broadcast buffer.
    pub fn new(capacity: usize) -> Self {
        let (inserts, _) = broadcast::channel(capacity.max(1));
        Self {
            tables: DashMap::new(),
            defaults: DashMap::new(),
            failing_reads: DashSet::new(),
            failing_writes: DashSet::new(),
            inserts,
        }
    }

    /// A store with the column defaults of the back-office tables.
    pub fn with_backoffice_defaults(capacity: usize) -> Self {
        let store = Self::new(capacity);
        store.set_default("notifications", "leida", Value::Bool(false));
        store.set_default("notifications", "tipo", Value::String("info".into()));
        store.set_default("pedidos", "estado_pedido", Value::String("pendiente".into()));
        store.set_default("pedidos", "estado_pago", Value::String("pendiente".into()));
        store
    }

    /// Register a value written into `column` when an insert omits it.
    pub fn set_default(&self, table: &str, column: &str, value: Value) {
        self.defaults
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), value);
    }

    /// Receive every future insert, across all tables.
    pub fn subscribe(&self) -> broadcast::Receiver<InsertEvent> {
        self.inserts.subscribe()
    }

    /// Make reads of `table` fail until [`restore`](Self::restore) is called.
    pub fn fail_reads(&self, table: &str) {
        self.failing_reads.insert(table.to_string());
    }

    /// Make writes to `table` fail until [`restore`](Self::restore) is called.
    pub fn fail_writes(&self, table: &str) {
        self.failing_writes.insert(table.to_string());
    }

    /// Clear injected failures for `table`.
    pub fn restore(&self, table: &str) {
        self.failing_reads.remove(table);
        self.failing_writes.remove(table);
    }

    /// Number of rows currently stored in `table`.
    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    fn check_write(&self, table: &str) -> AppResult<()> {
        if self.failing_writes.contains(table) {
            return Err(AppError::mutation(format!("Write to '{table}' rejected")));
        }
        Ok(())
    }

    fn find_by_id(&self, table: &str, id: &Value) -> Option<Value> {
        self.tables
            .get(table)?
            .iter()
            .find(|row| row.get("id") == Some(id))
            .cloned()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::with_backoffice_defaults(256)
    }
}

/// Compare two column values: timestamps chronologically, numbers
/// numerically, strings lexically; nulls sort last.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> AppResult<Vec<Value>> {
        if self.failing_reads.contains(table) {
            return Err(AppError::fetch(format!("Read of '{table}' rejected")));
        }

        let mut rows: Vec<Value> = self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.field).unwrap_or(&Value::Null);
                let b = b.get(&order.field).unwrap_or(&Value::Null);
                match order.direction {
                    SortDirection::Asc => compare_values(a, b),
                    SortDirection::Desc => compare_values(b, a),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        for expand in &query.expand {
            for row in rows.iter_mut() {
                let related = row
                    .get(&expand.foreign_key)
                    .and_then(|key| self.find_by_id(&expand.table, key))
                    .unwrap_or(Value::Null);
                if let Some(obj) = row.as_object_mut() {
                    obj.insert(expand.alias.clone(), related);
                }
            }
        }

        debug!(table, count = rows.len(), "Memory select");
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        self.check_write(table)?;
        let Value::Object(mut obj) = row else {
            return Err(AppError::mutation(format!(
                "Insert into '{table}' expects a JSON object"
            )));
        };

        if let Some(defaults) = self.defaults.get(table) {
            for (column, value) in defaults.iter() {
                if obj.get(column).is_none_or(Value::is_null) {
                    obj.insert(column.clone(), value.clone());
                }
            }
        }
        if obj.get("id").is_none_or(Value::is_null) {
            obj.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        if obj.get("created_at").is_none_or(Value::is_null) {
            obj.insert("created_at".into(), Value::String(now_timestamp()));
        }

        let stored = Value::Object(obj);
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());

        let _ = self.inserts.send(InsertEvent {
            table: table.to_string(),
            row: stored.clone(),
        });
        debug!(table, "Memory insert");
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[FilterField],
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        self.check_write(table)?;
        let Value::Object(patch) = patch else {
            return Err(AppError::mutation(format!(
                "Update of '{table}' expects a JSON object"
            )));
        };

        let mut updated = Vec::new();
        if let Some(mut rows) = self.tables.get_mut(table) {
            for row in rows.iter_mut() {
                if !filters.iter().all(|f| f.matches(row)) {
                    continue;
                }
                if let Some(obj) = row.as_object_mut() {
                    for (column, value) in &patch {
                        obj.insert(column.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        debug!(table, count = updated.len(), "Memory update");
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        self.check_write(table)?;
        let mut removed = 0u64;
        if let Some(mut rows) = self.tables.get_mut(table) {
            let before = rows.len();
            rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
            removed = (before - rows.len()) as u64;
        }
        debug!(table, count = removed, "Memory delete");
        Ok(removed)
    }
}
