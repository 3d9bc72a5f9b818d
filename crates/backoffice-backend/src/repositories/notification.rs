//! Notification repository implementation.

use std::sync::Arc;

use tracing::info;

use backoffice_core::result::AppResult;
use backoffice_core::traits::{Record, RecordStore};
use backoffice_core::types::{FilterField, NotificationId, SelectQuery, SortField};
use backoffice_entity::notification::{CreateNotification, Notification, NotificationPatch};

use super::{decode_row, decode_rows, single};

/// Repository for `notifications`.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: Arc<dyn RecordStore>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The latest-first query, capped at `limit` rows.
    pub fn latest_query(limit: usize) -> SelectQuery {
        SelectQuery::all()
            .order_by(SortField::desc("created_at"))
            .limit(limit)
    }

    /// The latest `limit` notifications.
    pub async fn latest(&self, limit: usize) -> AppResult<Vec<Notification>> {
        let rows = self
            .store
            .select(Notification::TABLE, &Self::latest_query(limit))
            .await?;
        decode_rows(Notification::TABLE, rows)
    }

    /// Publish a notification.
    pub async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        let row = self
            .store
            .insert(Notification::TABLE, serde_json::to_value(data)?)
            .await?;
        decode_row(Notification::TABLE, row)
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<Notification> {
        let rows = self
            .store
            .update(
                Notification::TABLE,
                &[FilterField::eq("id", id)],
                serde_json::to_value(NotificationPatch::mark_read())?,
            )
            .await?;
        single(Notification::TABLE, id, rows)
    }

    /// Mark every unread notification as read; returns how many changed.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        let rows = self
            .store
            .update(
                Notification::TABLE,
                &[FilterField::eq("leida", false)],
                serde_json::to_value(NotificationPatch::mark_read())?,
            )
            .await?;
        info!(count = rows.len(), "Notifications marked read");
        Ok(rows.len())
    }
}
