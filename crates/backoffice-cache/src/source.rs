//! Where a cached collection loads from and writes to.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::{Record, RecordStore};
use backoffice_core::types::{FilterField, SelectQuery};

/// Remote side of a [`CachedCollection`](crate::CachedCollection).
#[async_trait]
pub trait CollectionSource<T: Record>: Send + Sync + fmt::Debug + 'static {
    /// Fetch the whole collection.
    async fn fetch_all(&self) -> AppResult<Vec<T>>;

    /// Persist `patch` on the record with `id`.
    async fn update(&self, id: T::Id, patch: &T::Patch) -> AppResult<()>;
}

/// A collection source reading `T::TABLE` through a record store with a
/// fixed query.
pub struct StoreSource<T> {
    store: Arc<dyn RecordStore>,
    query: SelectQuery,
    _record: PhantomData<fn() -> T>,
}

impl<T> StoreSource<T> {
    /// Create a source running `query` against `store`.
    pub fn new(store: Arc<dyn RecordStore>, query: SelectQuery) -> Self {
        Self {
            store,
            query,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for StoreSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSource")
            .field("store", &self.store)
            .field("query", &self.query)
            .finish()
    }
}

#[async_trait]
impl<T: Record> CollectionSource<T> for StoreSource<T> {
    async fn fetch_all(&self) -> AppResult<Vec<T>> {
        let rows = self.store.select(T::TABLE, &self.query).await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Serialization,
                        format!("Malformed '{}' row: {e}", T::TABLE),
                        e,
                    )
                })
            })
            .collect()
    }

    async fn update(&self, id: T::Id, patch: &T::Patch) -> AppResult<()> {
        let rows = self
            .store
            .update(
                T::TABLE,
                &[FilterField::eq("id", id.to_string())],
                serde_json::to_value(patch)?,
            )
            .await?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!(
                "No row '{id}' in '{}'",
                T::TABLE
            )));
        }
        debug!(table = T::TABLE, %id, "Patch persisted");
        Ok(())
    }
}
