//! Record store trait for the managed relational backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::FilterField;
use crate::types::query::SelectQuery;

/// Table-oriented CRUD access to the managed backend.
///
/// Rows travel as JSON objects; typed repositories in `backoffice-backend`
/// convert them to entities. Implementations return `Fetch` errors for
/// reads and `Mutation` errors for writes.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch every row of `table` matching `query`.
    async fn select(&self, table: &str, query: &SelectQuery) -> AppResult<Vec<Value>>;

    /// Insert one row and return it as stored (with identity and defaults).
    async fn insert(&self, table: &str, row: Value) -> AppResult<Value>;

    /// Apply a partial patch to every row matching `filters`; returns the
    /// updated rows.
    async fn update(&self, table: &str, filters: &[FilterField], patch: Value)
    -> AppResult<Vec<Value>>;

    /// Delete every row matching `filters`; returns how many were removed.
    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64>;
}
