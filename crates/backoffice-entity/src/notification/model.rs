//! Notification entity model.

use backoffice_core::traits::Record;
use backoffice_core::types::{NotificationId, OrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;

/// A notification shown in the notifications menu (`notifications` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Short title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Body text.
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Display severity.
    #[serde(rename = "tipo", default)]
    pub kind: NotificationKind,
    /// Whether the notification has been read.
    #[serde(rename = "leida", default)]
    pub read: bool,
    /// The order this notification is about, if any.
    #[serde(rename = "pedido_id", default)]
    pub order_id: Option<OrderId>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

impl Record for Notification {
    type Id = NotificationId;
    type Patch = NotificationPatch;

    const TABLE: &'static str = "notifications";

    fn id(&self) -> NotificationId {
        self.id
    }

    fn apply_patch(&mut self, patch: &NotificationPatch) {
        if let Some(read) = patch.read {
            self.read = read;
        }
    }
}

/// Partial update of a notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPatch {
    /// New read flag.
    #[serde(rename = "leida", skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl NotificationPatch {
    /// Patch that marks a notification as read.
    pub fn mark_read() -> Self {
        Self { read: Some(true) }
    }
}

/// Data required to publish a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "leida")]
    pub read: bool,
    #[serde(rename = "pedido_id")]
    pub order_id: Option<OrderId>,
}

impl CreateNotification {
    /// An unread notification.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            read: false,
            order_id: None,
        }
    }

    /// Reference an order.
    pub fn for_order(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_row() {
        let notification: Notification = serde_json::from_value(json!({
            "id": "8d6f3c59-0a4e-4e55-9d7f-2b7c1e0a9f01",
            "titulo": "Nuevo pedido",
            "descripcion": "Juan Perez pidio 5g",
            "tipo": "success",
            "leida": false,
            "pedido_id": null,
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert!(notification.is_unread());
        assert_eq!(notification.kind, NotificationKind::Success);
        assert!(notification.order_id.is_none());
    }

    #[test]
    fn test_mark_read_patch() {
        let json = serde_json::to_value(NotificationPatch::mark_read()).unwrap();
        assert_eq!(json, json!({ "leida": true }));
    }
}
