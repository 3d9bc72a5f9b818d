//! Authentication gateway trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// An authenticated session issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for subsequent calls.
    pub access_token: String,
    /// Token used to renew the session.
    pub refresh_token: Option<String>,
    /// Email of the signed-in account.
    pub email: Option<String>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Whether the access token is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

/// Sign-in / session / sign-out against the backend's auth service.
///
/// A session is the precondition for every other remote call; the
/// application does not implement authentication itself.
#[async_trait]
pub trait AuthGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Sign in with an email/password pair.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// The current session, if signed in and not expired.
    async fn session(&self) -> Option<AuthSession>;

    /// Sign out and forget the session.
    async fn sign_out(&self) -> AppResult<()>;
}
