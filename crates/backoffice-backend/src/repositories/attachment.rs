//! Attached file repository implementation.

use std::sync::Arc;

use backoffice_core::result::AppResult;
use backoffice_core::traits::RecordStore;
use backoffice_core::types::{FileId, FilterField, MemberId, SelectQuery, SortField};
use backoffice_entity::attachment::{AttachedFile, CreateAttachedFile};

use super::{decode_row, decode_rows};

/// Backend table holding attachment metadata.
pub const ATTACHMENTS_TABLE: &str = "socio_archivos";

/// Repository for `socio_archivos`.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    store: Arc<dyn RecordStore>,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Files of one member, newest first.
    pub async fn list_by_member(&self, member_id: MemberId) -> AppResult<Vec<AttachedFile>> {
        let query = SelectQuery::all()
            .filter(FilterField::eq("socio_id", member_id))
            .order_by(SortField::desc("created_at"));
        let rows = self.store.select(ATTACHMENTS_TABLE, &query).await?;
        decode_rows(ATTACHMENTS_TABLE, rows)
    }

    /// Record an uploaded file.
    pub async fn create(&self, data: &CreateAttachedFile) -> AppResult<AttachedFile> {
        let row = self
            .store
            .insert(ATTACHMENTS_TABLE, serde_json::to_value(data)?)
            .await?;
        decode_row(ATTACHMENTS_TABLE, row)
    }

    /// Delete a file record; returns whether a row was removed.
    pub async fn delete(&self, id: FileId) -> AppResult<bool> {
        let removed = self
            .store
            .delete(ATTACHMENTS_TABLE, &[FilterField::eq("id", id)])
            .await?;
        Ok(removed > 0)
    }
}
