//! Managed backend connection configuration.

use serde::{Deserialize, Serialize};

/// Which record store implementation to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// The managed backend's REST API.
    #[default]
    Rest,
    /// An in-process store (offline demos and tests).
    Memory,
}

/// Connection settings for the managed backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Which store implementation to use.
    #[serde(default)]
    pub provider: BackendProvider,
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Public (anon) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            url: String::new(),
            anon_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl BackendConfig {
    /// REST endpoint root.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Auth endpoint root.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.trim_end_matches('/'))
    }

    /// Object storage endpoint root.
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url.trim_end_matches('/'))
    }

    /// Realtime websocket endpoint (http scheme swapped for ws).
    pub fn realtime_url(&self) -> String {
        let base = self
            .url
            .trim_end_matches('/')
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{base}/realtime/v1/websocket")
    }
}

fn default_timeout() -> u64 {
    15
}
