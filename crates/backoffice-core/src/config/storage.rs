//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Which object storage implementation to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// The managed backend's storage API.
    #[default]
    Remote,
    /// A local directory.
    Local,
}

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider to use.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Bucket holding member attachments.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Root path for the local provider.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Public base URL for the local provider (defaults to a `file://` URL).
    #[serde(default)]
    pub local_public_base: Option<String>,
    /// Maximum upload size in bytes (default 10 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            bucket: default_bucket(),
            local_root: default_local_root(),
            local_public_base: None,
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_bucket() -> String {
    "socio-files".to_string()
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    10_485_760 // 10 MB
}
