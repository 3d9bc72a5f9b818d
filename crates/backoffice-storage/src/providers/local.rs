//! Local filesystem object storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::ObjectStorage;

use crate::path::validate;

/// Stores objects as files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Prefix of public URLs; a `file://` URL of the root when unset.
    public_base: String,
}

impl LocalObjectStorage {
    /// Create a new local provider rooted at the given path.
    pub async fn new(root_path: &str, public_base: Option<String>) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Upload,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(&root).await.unwrap_or(root);
        let public_base = public_base
            .unwrap_or_else(|| format!("file://{}", root.display()))
            .trim_end_matches('/')
            .to_string();
        Ok(Self { root, public_base })
    }

    /// Resolve an object path to a file below the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(validate(path)?))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Upload,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Read an object back.
    pub async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Upload,
                    format!("Failed to read object: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Whether an object exists.
    pub async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(fs::try_exists(self.resolve(path)?).await.unwrap_or(false))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Upload, format!("Failed to write object: {path}"), e)
        })?;

        debug!(path, content_type, bytes = data.len(), "Wrote object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|p| !p.is_empty())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        for path in paths {
            let full_path = self.resolve(path)?;
            match fs::remove_file(&full_path).await {
                Ok(()) => debug!(path, "Removed object"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Upload,
                        format!("Failed to delete object: {path}"),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_str().unwrap(), None)
            .await
            .unwrap();

        let data = Bytes::from("%PDF-1.4");
        storage
            .upload("socio/a.pdf", data.clone(), "application/pdf")
            .await
            .unwrap();
        assert!(storage.exists("socio/a.pdf").await.unwrap());
        assert_eq!(storage.read_bytes("socio/a.pdf").await.unwrap(), data);

        storage.remove(&["socio/a.pdf".to_string()]).await.unwrap();
        assert!(!storage.exists("socio/a.pdf").await.unwrap());
        // Removing again is not an error.
        storage.remove(&["socio/a.pdf".to_string()]).await.unwrap();
    }

    #[tokio::test]
    async fn test_public_url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(
            dir.path().to_str().unwrap(),
            Some("http://localhost:9000/files/".into()),
        )
        .await
        .unwrap();

        let url = storage.public_url("m1/x.png");
        assert_eq!(url, "http://localhost:9000/files/m1/x.png");
        assert_eq!(storage.path_from_url(&url).as_deref(), Some("m1/x.png"));
        assert_eq!(storage.path_from_url("https://elsewhere/x.png"), None);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_str().unwrap(), None)
            .await
            .unwrap();
        let err = storage
            .upload("../escape.txt", Bytes::from("x"), "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upload);
    }
}
