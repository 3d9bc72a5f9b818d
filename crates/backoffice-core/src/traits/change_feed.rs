//! Push channel trait for insert events.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::result::AppResult;

/// A stream of newly inserted rows. Dropping it releases the channel.
pub type InsertStream = Pin<Box<dyn Stream<Item = Value> + Send>>;

/// Server-to-client feed of newly inserted rows, one table per channel.
#[async_trait]
pub trait ChangeFeed: Send + Sync + std::fmt::Debug + 'static {
    /// Open a channel delivering every row inserted into `table` from now on.
    ///
    /// Each call opens an independent channel; two open channels on the same
    /// table both receive every insert.
    async fn subscribe_inserts(&self, table: &str) -> AppResult<InsertStream>;
}
