//! # backoffice-realtime
//!
//! Server-to-client insert feeds:
//!
//! - [`MemoryChangeFeed`] bridges the in-process store's insert broadcast
//! - [`PhoenixChangeFeed`] speaks the backend's Phoenix channel protocol
//!   over a websocket, with heartbeat and `phx_leave` on release

pub mod feed;
pub mod message;

use std::sync::Arc;

use backoffice_backend::Backend;
use backoffice_core::config::RealtimeConfig;
use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::ChangeFeed;

pub use feed::memory::MemoryChangeFeed;
pub use feed::phoenix::PhoenixChangeFeed;

/// The change feed matching the wired backend.
pub fn connect(config: &RealtimeConfig, backend: &Backend) -> AppResult<Arc<dyn ChangeFeed>> {
    if let Some(store) = &backend.memory {
        return Ok(Arc::new(MemoryChangeFeed::new(store.clone())));
    }
    match &backend.client {
        Some(client) => Ok(Arc::new(PhoenixChangeFeed::new(client.clone(), config.clone()))),
        None => Err(AppError::configuration(
            "No backend available for the change feed",
        )),
    }
}
