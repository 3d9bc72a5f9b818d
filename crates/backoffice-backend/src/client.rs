//! HTTP client for the managed backend.
//!
//! One [`BackendClient`] is shared by the REST record store, the remote
//! auth gateway and the remote object storage. It owns the signed-in
//! session so every request carries the current access token.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use backoffice_core::config::BackendConfig;
use backoffice_core::error::{AppError, ErrorKind};
use backoffice_core::result::AppResult;
use backoffice_core::traits::AuthSession;

/// Shared HTTP wiring: base URLs, API key and the current session.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl BackendClient {
    /// Build a client from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration("backend.url is not set"));
        }
        Url::parse(&config.url).map_err(|e| {
            AppError::configuration(format!("backend.url is not a valid URL: {e}"))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        info!(url = %config.url, timeout = config.timeout_seconds, "Backend client ready");
        Ok(Self {
            http,
            config: config.clone(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Backend configuration this client was built from.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Store a fresh session; later requests use its access token.
    pub async fn set_session(&self, session: AuthSession) {
        *self.session.write().await = Some(session);
    }

    /// Forget the current session.
    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// The current session, if one is held and not expired.
    pub async fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .await
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    /// Bearer token: the session's access token, else the anon key.
    pub async fn bearer_token(&self) -> String {
        match self.session().await {
            Some(session) => session.access_token,
            None => self.config.anon_key.clone(),
        }
    }

    /// Parse an endpoint URL under one of the service roots.
    pub fn endpoint(&self, root: &str, path: &str) -> AppResult<Url> {
        let raw = format!("{}/{}", root.trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| AppError::configuration(format!("Invalid URL '{raw}': {e}")))
    }

    /// Start a request with the API key and bearer headers.
    pub async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Backend request");
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.config.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token().await))
        {
            headers.insert(AUTHORIZATION, bearer);
        }
        self.http.request(method, url).headers(headers)
    }

    /// Send a request, mapping transport failures to `kind`.
    pub async fn send(&self, request: RequestBuilder, kind: ErrorKind) -> AppResult<Response> {
        request
            .send()
            .await
            .map_err(|e| AppError::with_source(kind, format!("Backend unreachable: {e}"), e))
    }

    /// Check the status and decode a JSON body (empty bodies become `null`).
    pub async fn handle_response(response: Response, kind: ErrorKind) -> AppResult<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::with_source(kind, "Failed to read backend response", e))?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or(text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AppError::authentication(format!("HTTP {status}: {message}"))
                }
                _ => AppError::new(kind, format!("HTTP {status}: {message}")),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(AppError::from)
    }
}

/// Pull the human-readable message out of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BackendConfig {
        BackendConfig {
            url: "https://abc.supabase.co".into(),
            anon_key: "anon".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_missing_url() {
        let err = BackendClient::new(&BackendConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_endpoint_join() {
        let client = BackendClient::new(&config()).unwrap();
        let url = client
            .endpoint(&client.config().rest_url(), "/pedidos")
            .unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/pedidos");
    }

    #[tokio::test]
    async fn test_bearer_falls_back_to_anon_key() {
        let client = BackendClient::new(&config()).unwrap();
        assert_eq!(client.bearer_token().await, "anon");

        client
            .set_session(AuthSession {
                access_token: "jwt".into(),
                refresh_token: None,
                email: None,
                expires_at: None,
            })
            .await;
        assert_eq!(client.bearer_token().await, "jwt");

        client.clear_session().await;
        assert!(client.session().await.is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"duplicate key","code":"23505"}"#).as_deref(),
            Some("duplicate key")
        );
        assert_eq!(error_message("plain"), None);
    }
}
