//! Cached collection with optimistic updates and push merge.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use backoffice_core::error::ErrorKind;
use backoffice_core::result::AppResult;
use backoffice_core::traits::{ChangeFeed, Record};

use crate::source::CollectionSource;
use crate::subscription::LiveSubscription;

/// A patch already applied locally whose remote write is still pending.
///
/// Hand it to [`CachedCollection::commit`]; dropping it without committing
/// leaves the local edit unconfirmed until the next load.
#[derive(Debug, Clone)]
#[must_use = "an optimistic update is only persisted once committed"]
pub struct PendingUpdate<T: Record> {
    id: T::Id,
    patch: T::Patch,
    applied_locally: bool,
}

impl<T: Record> PendingUpdate<T> {
    /// Record the patch targets.
    pub fn id(&self) -> T::Id {
        self.id
    }

    /// The patch to persist.
    pub fn patch(&self) -> &T::Patch {
        &self.patch
    }

    /// Whether the target was present in the cache when the patch applied.
    pub fn applied_locally(&self) -> bool {
        self.applied_locally
    }
}

/// The most recently fetched collection of one entity type.
pub struct CachedCollection<T: Record> {
    records: Arc<RwLock<Vec<T>>>,
    source: Arc<dyn CollectionSource<T>>,
    capacity: Option<usize>,
}

impl<T: Record> Clone for CachedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            source: Arc::clone(&self.source),
            capacity: self.capacity,
        }
    }
}

impl<T: Record> fmt::Debug for CachedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCollection")
            .field("table", &T::TABLE)
            .field("source", &self.source)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T: Record> CachedCollection<T> {
    /// Create an empty cache over `source`.
    pub fn new(source: Arc<dyn CollectionSource<T>>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            source,
            capacity: None,
        }
    }

    /// Keep at most `capacity` records when pushed inserts are merged;
    /// the oldest ones fall off the end.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Fetch the full collection and replace the local one.
    ///
    /// On failure the previous collection stays in place.
    pub async fn load(&self) -> AppResult<Vec<T>> {
        let rows = match self.source.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(table = T::TABLE, error = %e, "Collection load failed");
                return Err(e.into_kind(ErrorKind::Fetch));
            }
        };
        *self.records.write().await = rows.clone();
        debug!(table = T::TABLE, count = rows.len(), "Collection loaded");
        Ok(rows)
    }

    /// Apply `patch` to the cached record with `id` right away and return
    /// the remote write still to be committed.
    ///
    /// An id that is not cached leaves the collection untouched.
    pub async fn apply_optimistic(&self, id: T::Id, patch: T::Patch) -> PendingUpdate<T> {
        let mut records = self.records.write().await;
        let applied_locally = match records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.apply_patch(&patch);
                true
            }
            None => {
                debug!(table = T::TABLE, %id, "Optimistic patch on uncached record");
                false
            }
        };
        PendingUpdate {
            id,
            patch,
            applied_locally,
        }
    }

    /// Persist a pending update.
    ///
    /// On failure the whole collection is reloaded, discarding the
    /// optimistic edit, and a `Mutation` error is returned.
    pub async fn commit(&self, update: PendingUpdate<T>) -> AppResult<()> {
        let err = match self.source.update(update.id, &update.patch).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        warn!(table = T::TABLE, id = %update.id, error = %err, "Commit failed, reloading");
        if let Err(reload) = self.load().await {
            warn!(table = T::TABLE, error = %reload, "Reload after failed commit failed");
        }
        Err(err.into_kind(ErrorKind::Mutation))
    }

    /// Apply and commit in one go.
    pub async fn update(&self, id: T::Id, patch: T::Patch) -> AppResult<()> {
        let pending = self.apply_optimistic(id, patch).await;
        self.commit(pending).await
    }

    /// Merge rows inserted into `T::TABLE` while the returned guard lives.
    ///
    /// Each pushed row is prepended, then `on_insert` runs with it. Rows
    /// that do not decode are skipped.
    pub async fn subscribe<F>(
        &self,
        feed: &dyn ChangeFeed,
        on_insert: F,
    ) -> AppResult<LiveSubscription>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut inserts = feed.subscribe_inserts(T::TABLE).await?;
        let records = Arc::clone(&self.records);
        let capacity = self.capacity;
        let task = tokio::spawn(async move {
            while let Some(row) = inserts.next().await {
                match serde_json::from_value::<T>(row) {
                    Ok(record) => {
                        {
                            let mut records = records.write().await;
                            records.insert(0, record.clone());
                            if let Some(capacity) = capacity {
                                records.truncate(capacity);
                            }
                        }
                        on_insert(&record);
                    }
                    Err(e) => {
                        warn!(table = T::TABLE, error = %e, "Skipping undecodable pushed row");
                    }
                }
            }
            debug!(table = T::TABLE, "Insert stream ended");
        });
        info!(table = T::TABLE, "Subscribed to inserts");
        Ok(LiveSubscription::new(T::TABLE, task))
    }

    /// Clone of the current collection.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Clone of the cached record with `id`.
    pub async fn get(&self, id: T::Id) -> Option<T> {
        self.records.read().await.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Edit the local collection in place after a confirmed remote change.
    pub async fn replace_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut records = self.records.write().await;
        f(&mut records)
    }
}
