//! Scoped push-channel subscription.

use tokio::task::JoinHandle;
use tracing::debug;

/// Keeps a push channel open and merging into a cached collection.
///
/// The channel is released when the guard is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called.
#[derive(Debug)]
pub struct LiveSubscription {
    table: &'static str,
    task: JoinHandle<()>,
}

impl LiveSubscription {
    pub(crate) fn new(table: &'static str, task: JoinHandle<()>) -> Self {
        Self { table, task }
    }

    /// Table this subscription listens on.
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Whether the channel is still delivering.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Release the channel now.
    pub fn unsubscribe(self) {}
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        self.task.abort();
        debug!(table = self.table, "Subscription released");
    }
}
