//! Upload, list and delete member attachments.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use backoffice_backend::Backend;
use backoffice_backend::repositories::AttachmentRepository;
use backoffice_core::traits::ObjectStorage;
use backoffice_core::types::MemberId;
use backoffice_core::{AppError, AppResult};
use backoffice_entity::attachment::{AttachedFile, CreateAttachedFile};
use backoffice_storage::{mime, path};

/// Stores attachment bytes in object storage and their metadata in the
/// `socio_archivos` table.
#[derive(Debug, Clone)]
pub struct FileService {
    repo: AttachmentRepository,
    storage: Arc<dyn ObjectStorage>,
    max_upload_bytes: u64,
}

impl FileService {
    pub fn new(backend: &Backend, storage: Arc<dyn ObjectStorage>, max_upload_bytes: u64) -> Self {
        Self {
            repo: backend.attachments(),
            storage,
            max_upload_bytes,
        }
    }

    /// Files of a member, newest first.
    pub async fn list(&self, member_id: MemberId) -> AppResult<Vec<AttachedFile>> {
        self.repo.list_by_member(member_id).await
    }

    /// Store `data` under the member's prefix and record it.
    ///
    /// The content type is guessed from `filename` when not given. Only
    /// images and PDFs are accepted.
    pub async fn upload(
        &self,
        member_id: MemberId,
        filename: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<AttachedFile> {
        let mime_type = content_type
            .map(str::to_string)
            .or_else(|| mime::mime_from_path(filename))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !mime::is_accepted(&mime_type) {
            return Err(AppError::validation(format!(
                "file: type '{mime_type}' is not accepted"
            )));
        }
        let size = data.len() as u64;
        if size > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "file: {size} bytes exceeds the {} byte limit",
                self.max_upload_bytes
            )));
        }

        let object_path = path::object_path(member_id, filename);
        self.storage.upload(&object_path, data, &mime_type).await?;
        let url = self.storage.public_url(&object_path);

        let record = CreateAttachedFile {
            member_id,
            name: filename.to_string(),
            url,
            mime_type,
            size,
        };
        match self.repo.create(&record).await {
            Ok(file) => {
                info!(file_id = %file.id, member_id = %member_id, size, "File attached");
                Ok(file)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&[object_path.clone()]).await {
                    warn!(
                        path = %object_path,
                        error = %cleanup,
                        "Orphaned object after failed insert"
                    );
                }
                Err(e)
            }
        }
    }

    /// Delete the record, then the stored object.
    ///
    /// A storage failure after the record is gone is logged only.
    pub async fn delete(&self, file: &AttachedFile) -> AppResult<()> {
        if !self.repo.delete(file.id).await? {
            return Err(AppError::not_found(format!("File {} not found", file.id)));
        }
        info!(file_id = %file.id, "File record deleted");

        let Some(object_path) = self.storage.path_from_url(&file.url) else {
            warn!(url = %file.url, "Cannot derive object path from URL");
            return Ok(());
        };
        if let Err(e) = self.storage.remove(&[object_path.clone()]).await {
            warn!(path = %object_path, error = %e, "Stored object not deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use backoffice_core::error::ErrorKind;
    use backoffice_entity::member::CreateMember;
    use backoffice_storage::LocalObjectStorage;

    use super::*;
    use crate::fixtures::memory_backend;

    async fn setup(
        dir: &tempfile::TempDir,
    ) -> (
        FileService,
        Arc<LocalObjectStorage>,
        Arc<backoffice_backend::MemoryRecordStore>,
        MemberId,
    ) {
        let (backend, store) = memory_backend();
        let storage = Arc::new(
            LocalObjectStorage::new(dir.path().to_str().unwrap(), Some("http://files".into()))
                .await
                .unwrap(),
        );
        let member = backend
            .members()
            .create(&CreateMember::new("Juan Perez", None))
            .await
            .unwrap();
        let service = FileService::new(&backend, storage.clone(), 1024);
        (service, storage, store, member.id)
    }

    #[tokio::test]
    async fn test_upload_then_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let (service, storage, _, member_id) = setup(&dir).await;

        let file = service
            .upload(member_id, "receta.pdf", Bytes::from_static(b"%PDF-1.4"), None)
            .await
            .unwrap();
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size, 8);
        assert!(file.url.starts_with(&format!("http://files/{member_id}/")));
        assert!(file.url.ends_with(".pdf"));

        let object_path = storage.path_from_url(&file.url).unwrap();
        assert!(storage.exists(&object_path).await.unwrap());
        assert_eq!(service.list(member_id).await.unwrap().len(), 1);

        service.delete(&file).await.unwrap();
        assert!(service.list(member_id).await.unwrap().is_empty());
        assert!(!storage.exists(&object_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_type_and_size_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _, store, member_id) = setup(&dir).await;

        let err = service
            .upload(member_id, "notes.txt", Bytes::from_static(b"hi"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .upload(member_id, "big.png", Bytes::from(vec![0u8; 2048]), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.count("socio_archivos"), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_removes_uploaded_object() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _, store, member_id) = setup(&dir).await;
        store.fail_writes("socio_archivos");

        let err = service
            .upload(member_id, "foto.jpg", Bytes::from_static(b"jpeg"), Some("image/jpeg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Mutation);
        let leftover = std::fs::read_dir(dir.path().join(member_id.to_string()))
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_after_record_delete_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _, _, member_id) = setup(&dir).await;
        let mut file = service
            .upload(member_id, "foto.png", Bytes::from_static(b"png"), None)
            .await
            .unwrap();
        file.url = "https://elsewhere/x.png".into();

        service.delete(&file).await.unwrap();
        assert!(service.list(member_id).await.unwrap().is_empty());
    }
}
