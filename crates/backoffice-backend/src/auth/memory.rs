//! In-process auth gateway.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::{AuthGateway, AuthSession};

/// Accepts one configured account, or any non-empty credentials when no
/// account is configured.
#[derive(Debug, Default)]
pub struct MemoryAuthGateway {
    account: Option<(String, String)>,
    session: RwLock<Option<AuthSession>>,
}

impl MemoryAuthGateway {
    /// Gateway accepting any non-empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway accepting only `email`/`password`.
    pub fn with_account(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: Some((email.into(), password.into())),
            session: RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthGateway for MemoryAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }
        if let Some((expected_email, expected_password)) = &self.account {
            if expected_email != email || expected_password != password {
                return Err(AppError::authentication("Invalid login credentials"));
            }
        }

        let session = AuthSession {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            email: Some(email.to_string()),
            expires_at: None,
        };
        *self.session.write().await = Some(session.clone());
        info!(email, "Signed in (memory)");
        Ok(session)
    }

    async fn session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    async fn sign_out(&self) -> AppResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::error::ErrorKind;

    #[tokio::test]
    async fn test_configured_account() {
        let auth = MemoryAuthGateway::with_account("admin@example.com", "secret");
        let err = auth.sign_in("admin@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(auth.session().await.is_none());

        auth.sign_in("admin@example.com", "secret").await.unwrap();
        assert!(auth.session().await.is_some());
        auth.sign_out().await.unwrap();
        assert!(auth.session().await.is_none());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let auth = MemoryAuthGateway::new();
        assert!(auth.sign_in("", "x").await.unwrap_err().is_validation());
    }
}
