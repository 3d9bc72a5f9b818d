//! Cross-view UI flags shared by composition.

use tokio::sync::watch;
use tracing::debug;

/// Flags any screen may read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    /// The quick-order panel is open.
    pub quick_order_open: bool,
}

/// Single writer of [`UiFlags`]. Readers hold a [`watch::Receiver`]
/// obtained from [`AppContext::watch`].
#[derive(Debug)]
pub struct AppContext {
    flags: watch::Sender<UiFlags>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    pub fn new() -> Self {
        let (flags, _) = watch::channel(UiFlags::default());
        Self { flags }
    }

    /// Current flags.
    pub fn flags(&self) -> UiFlags {
        *self.flags.borrow()
    }

    /// Subscribe to flag changes.
    pub fn watch(&self) -> watch::Receiver<UiFlags> {
        self.flags.subscribe()
    }

    pub fn open_quick_order(&self) {
        self.set_quick_order(true);
    }

    pub fn close_quick_order(&self) {
        self.set_quick_order(false);
    }

    fn set_quick_order(&self, open: bool) {
        let changed = self.flags.send_if_modified(|flags| {
            let changed = flags.quick_order_open != open;
            flags.quick_order_open = open;
            changed
        });
        if changed {
            debug!(open, "Quick-order panel toggled");
        }
    }
}
