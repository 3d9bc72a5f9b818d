//! Backend wiring selected by configuration.

use std::sync::Arc;

use tracing::info;

use backoffice_core::config::{AppConfig, BackendProvider};
use backoffice_core::result::AppResult;
use backoffice_core::traits::{AuthGateway, RecordStore};

use crate::auth::{MemoryAuthGateway, RemoteAuthGateway};
use crate::client::BackendClient;
use crate::repositories::{
    AttachmentRepository, MemberRepository, NotificationRepository, OrderRepository,
};
use crate::store::{MemoryRecordStore, RestRecordStore};

/// The record store and auth gateway for one backend, plus the concrete
/// handles other crates need to build their own adapters.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Record store used by every repository.
    pub records: Arc<dyn RecordStore>,
    /// Auth gateway.
    pub auth: Arc<dyn AuthGateway>,
    /// HTTP client, present for the REST provider.
    pub client: Option<BackendClient>,
    /// In-process store, present for the memory provider.
    pub memory: Option<Arc<MemoryRecordStore>>,
}

impl Backend {
    /// Wire the backend named by `config.backend.provider`.
    pub fn connect(config: &AppConfig) -> AppResult<Self> {
        match config.backend.provider {
            BackendProvider::Rest => {
                let client = BackendClient::new(&config.backend)?;
                info!(provider = "rest", "Backend connected");
                Ok(Self {
                    records: Arc::new(RestRecordStore::new(client.clone())),
                    auth: Arc::new(RemoteAuthGateway::new(client.clone())),
                    client: Some(client),
                    memory: None,
                })
            }
            BackendProvider::Memory => {
                let store = Arc::new(MemoryRecordStore::with_backoffice_defaults(
                    config.realtime.channel_buffer_size,
                ));
                let auth = match (&config.auth.email, &config.auth.password) {
                    (Some(email), Some(password)) => {
                        MemoryAuthGateway::with_account(email.clone(), password.clone())
                    }
                    _ => MemoryAuthGateway::new(),
                };
                info!(provider = "memory", "Backend connected");
                Ok(Self::from_memory(store, Arc::new(auth)))
            }
        }
    }

    /// Wire an existing in-process store.
    pub fn from_memory(store: Arc<MemoryRecordStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            records: store.clone(),
            auth,
            client: None,
            memory: Some(store),
        }
    }

    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(self.records.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.records.clone())
    }

    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new(self.records.clone())
    }

    pub fn attachments(&self) -> AttachmentRepository {
        AttachmentRepository::new(self.records.clone())
    }
}
