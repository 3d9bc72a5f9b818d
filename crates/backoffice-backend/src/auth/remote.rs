//! Auth gateway for the backend's password grant endpoint.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::{AuthGateway, AuthSession};

use crate::client::BackendClient;

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            email: self.user.and_then(|u| u.email),
            expires_at: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

/// Signs in against the backend and stores the session in the shared client.
#[derive(Debug, Clone)]
pub struct RemoteAuthGateway {
    client: BackendClient,
}

impl RemoteAuthGateway {
    /// Create a new remote auth gateway.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for RemoteAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }

        let mut url = self
            .client
            .endpoint(&self.client.config().auth_url(), "token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .client
            .request(Method::POST, url)
            .await
            .json(&json!({ "email": email, "password": password }));
        let response = self.client.send(request, ErrorKind::Authentication).await?;
        let body = BackendClient::handle_response(response, ErrorKind::Authentication)
            .await
            .map_err(|e| {
                warn!(email, error = %e, "Sign-in rejected");
                e.into_kind(ErrorKind::Authentication)
            })?;

        let token: TokenResponse = serde_json::from_value(body)?;
        let session = token.into_session();
        self.client.set_session(session.clone()).await;
        info!(email, "Signed in");
        Ok(session)
    }

    async fn session(&self) -> Option<AuthSession> {
        self.client.session().await
    }

    async fn sign_out(&self) -> AppResult<()> {
        if self.client.session().await.is_none() {
            return Ok(());
        }
        let url = self
            .client
            .endpoint(&self.client.config().auth_url(), "logout")?;
        let request = self.client.request(Method::POST, url).await;
        let result = match self.client.send(request, ErrorKind::Authentication).await {
            Ok(response) => BackendClient::handle_response(response, ErrorKind::Authentication)
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        };
        self.client.clear_session().await;
        if let Err(e) = &result {
            warn!(error = %e, "Remote sign-out failed; local session cleared");
        }
        info!("Signed out");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_into_session() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "u", "email": "admin@example.com" }
        }))
        .unwrap();
        let session = token.into_session();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.email.as_deref(), Some("admin@example.com"));
        assert!(!session.is_expired());
    }
}
