//! Where opening a notification leads.

use backoffice_core::types::OrderId;
use backoffice_entity::notification::Notification;

/// Navigation target resolved from the entity a notification references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// No referenced entity; stay on the current screen.
    Stay,
    /// The detail of the referenced order.
    OrderDetail(OrderId),
}

impl From<&Notification> for Destination {
    fn from(notification: &Notification) -> Self {
        match notification.order_id {
            Some(order_id) => Self::OrderDetail(order_id),
            None => Self::Stay,
        }
    }
}
