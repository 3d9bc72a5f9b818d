//! # backoffice-storage
//!
//! Object storage for member attachments: the backend's bucket API and a
//! local filesystem provider, plus object path generation and MIME
//! guessing.

pub mod mime;
pub mod path;
pub mod providers;

use std::sync::Arc;

use tracing::info;

use backoffice_backend::BackendClient;
use backoffice_core::config::{StorageConfig, StorageProviderKind};
use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::ObjectStorage;

pub use providers::{LocalObjectStorage, RemoteObjectStorage};

/// Build the provider named by `config.provider`.
///
/// The remote provider needs the backend client; pass `None` when running
/// without one (memory backend) and select the local provider instead.
pub async fn connect(
    config: &StorageConfig,
    client: Option<BackendClient>,
) -> AppResult<Arc<dyn ObjectStorage>> {
    let storage: Arc<dyn ObjectStorage> = match config.provider {
        StorageProviderKind::Remote => {
            let client = client.ok_or_else(|| {
                AppError::configuration(
                    "storage.provider = remote requires backend.provider = rest",
                )
            })?;
            Arc::new(RemoteObjectStorage::new(client, &config.bucket))
        }
        StorageProviderKind::Local => Arc::new(
            LocalObjectStorage::new(&config.local_root, config.local_public_base.clone()).await?,
        ),
    };
    info!(provider = storage.provider_type(), bucket = %config.bucket, "Object storage ready");
    Ok(storage)
}
