//! Push channel configuration.

use serde::{Deserialize, Serialize};

/// Push channel (change feed) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of the per-subscription delivery channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Websocket heartbeat interval in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Database schema the change feed listens on.
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            schema: default_schema(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_schema() -> String {
    "public".to_string()
}
