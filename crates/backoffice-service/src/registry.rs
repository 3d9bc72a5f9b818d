//! All services of one signed-in session, built from configuration.

use std::sync::Arc;

use tracing::info;

use backoffice_backend::Backend;
use backoffice_core::AppResult;
use backoffice_core::config::AppConfig;
use backoffice_core::traits::{ChangeFeed, ObjectStorage};

use crate::context::AppContext;
use crate::dashboard::DashboardService;
use crate::file::FileService;
use crate::member::MemberService;
use crate::notification::NotificationCenter;
use crate::order::OrderService;

/// The services every screen draws from, plus the shared UI context.
#[derive(Debug)]
pub struct AppServices {
    pub backend: Backend,
    pub members: MemberService,
    pub orders: OrderService,
    pub notifications: NotificationCenter,
    pub files: FileService,
    pub dashboard: DashboardService,
    pub context: AppContext,
}

impl AppServices {
    pub fn new(
        config: &AppConfig,
        backend: Backend,
        storage: Arc<dyn ObjectStorage>,
        feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            members: MemberService::new(&backend),
            orders: OrderService::new(&backend),
            notifications: NotificationCenter::new(
                &backend,
                feed,
                config.dashboard.notification_limit,
            ),
            files: FileService::new(&backend, storage, config.storage.max_upload_bytes),
            dashboard: DashboardService::new(&backend, config.dashboard.clone()),
            context: AppContext::new(),
            backend,
        }
    }

    /// Connect the configured backend, sign in with the configured account
    /// (if any), and wire storage and the change feed.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let backend = Backend::connect(config)?;
        if let (Some(email), Some(password)) = (&config.auth.email, &config.auth.password) {
            let session = backend.auth.sign_in(email, password).await?;
            info!(email = session.email.as_deref().unwrap_or(email), "Signed in");
        }
        let storage = backoffice_storage::connect(&config.storage, backend.client.clone()).await?;
        let feed = backoffice_realtime::connect(&config.realtime, &backend)?;
        Ok(Self::new(config, backend, storage, feed))
    }

    /// Sign out of the backend.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.backend.auth.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use backoffice_core::config::{BackendProvider, StorageProviderKind};
    use backoffice_core::error::ErrorKind;

    use super::*;

    fn memory_config(root: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.provider = BackendProvider::Memory;
        config.storage.provider = StorageProviderKind::Local;
        config.storage.local_root = root.display().to_string();
        config
    }

    #[tokio::test]
    async fn test_connect_memory_signs_in_and_serves() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = memory_config(dir.path());
        config.auth.email = Some("admin@example.com".into());
        config.auth.password = Some("secret".into());

        let services = AppServices::connect(&config).await.unwrap();
        assert!(services.backend.auth.session().await.is_some());
        assert!(services.orders.load().await.unwrap().is_empty());

        services.sign_out().await.unwrap();
        assert!(services.backend.auth.session().await.is_none());
    }

    #[tokio::test]
    async fn test_remote_storage_needs_rest_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = memory_config(dir.path());
        config.storage.provider = StorageProviderKind::Remote;
        let err = AppServices::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
