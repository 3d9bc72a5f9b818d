//! Change feed over the in-process store's insert broadcast.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use backoffice_backend::MemoryRecordStore;
use backoffice_core::result::AppResult;
use backoffice_core::traits::{ChangeFeed, InsertStream};

/// In-memory change feed.
#[derive(Debug, Clone)]
pub struct MemoryChangeFeed {
    store: Arc<MemoryRecordStore>,
}

impl MemoryChangeFeed {
    /// Create a feed over `store`.
    pub fn new(store: Arc<MemoryRecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn subscribe_inserts(&self, table: &str) -> AppResult<InsertStream> {
        let rx = self.store.subscribe();
        let table = table.to_string();
        debug!(table = %table, "Memory channel opened");

        let inserts = stream::unfold((rx, table), |(mut rx, table)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.table == table => return Some((event.row, (rx, table))),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(table = %table, skipped, "Change feed lagged; inserts dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(inserts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::traits::RecordStore;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_only_subscribed_table_is_delivered() {
        let store = Arc::new(MemoryRecordStore::default());
        let feed = MemoryChangeFeed::new(store.clone());
        let mut inserts = feed.subscribe_inserts("notifications").await.unwrap();

        store.insert("pedidos", json!({ "variedad": "x" })).await.unwrap();
        store
            .insert("notifications", json!({ "titulo": "Nuevo pedido" }))
            .await
            .unwrap();

        let row = inserts.next().await.unwrap();
        assert_eq!(row["titulo"], "Nuevo pedido");
    }

    #[tokio::test]
    async fn test_two_channels_both_receive() {
        let store = Arc::new(MemoryRecordStore::default());
        let feed = MemoryChangeFeed::new(store.clone());
        let mut a = feed.subscribe_inserts("notifications").await.unwrap();
        let mut b = feed.subscribe_inserts("notifications").await.unwrap();

        store.insert("notifications", json!({ "titulo": "x" })).await.unwrap();
        assert_eq!(a.next().await.unwrap()["titulo"], "x");
        assert_eq!(b.next().await.unwrap()["titulo"], "x");
    }
}
