//! Shared test helpers for integration tests.

use std::time::Duration;

use rust_decimal::Decimal;
use tempfile::TempDir;

use backoffice_core::config::{AppConfig, BackendProvider, StorageProviderKind};
use backoffice_entity::member::{CreateMember, Member};
use backoffice_entity::order::OrderDraft;
use backoffice_service::AppServices;

/// Services wired to the in-process backend and a temporary storage root.
pub struct TestApp {
    pub services: AppServices,
    pub config: AppConfig,
    _storage: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let storage = tempfile::tempdir().expect("Failed to create storage root");
        let config = AppConfig::from_toml(&format!(
            r#"
            [backend]
            provider = "memory"

            [auth]
            email = "admin@example.com"
            password = "secret"

            [storage]
            provider = "local"
            local_root = "{}"
            local_public_base = "http://files"
            max_upload_bytes = 1024

            [dashboard]
            trailing_days = 7
            "#,
            storage.path().display()
        ))
        .expect("Failed to parse test config");
        assert_eq!(config.backend.provider, BackendProvider::Memory);
        assert_eq!(config.storage.provider, StorageProviderKind::Local);

        let services = AppServices::connect(&config)
            .await
            .expect("Failed to connect services");
        Self {
            services,
            config,
            _storage: storage,
        }
    }

    pub async fn create_member(&self, name: &str, phone: Option<&str>) -> Member {
        self.services
            .members
            .create(CreateMember::new(name, phone.map(str::to_string)))
            .await
            .expect("Failed to create member")
    }

    pub fn order_draft(member: &Member, variety: &str, quantity: i64, total: i64) -> OrderDraft {
        OrderDraft::default()
            .member(member.id)
            .variety(variety)
            .quantity(Decimal::from(quantity))
            .total(Decimal::from(total))
    }
}

/// Poll `check` until it holds or a second passes.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
