//! Phoenix channel message envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event names used by the channel protocol.
pub mod events {
    pub const JOIN: &str = "phx_join";
    pub const LEAVE: &str = "phx_leave";
    pub const REPLY: &str = "phx_reply";
    pub const ERROR: &str = "phx_error";
    pub const CLOSE: &str = "phx_close";
    pub const HEARTBEAT: &str = "heartbeat";
    pub const POSTGRES_CHANGES: &str = "postgres_changes";
}

/// One frame on the socket (JSON serializer, protocol `1.0.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    /// Channel topic, e.g. `realtime:notifications`.
    pub topic: String,
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub payload: Value,
    /// Request reference, echoed by replies.
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    /// Reference of the join that opened the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl PhoenixMessage {
    /// Whether this is a reply to the request with `reference`.
    pub fn is_reply_to(&self, reference: &str) -> bool {
        self.event == events::REPLY && self.reference.as_deref() == Some(reference)
    }

    /// Status of a reply (`ok` or `error`).
    pub fn reply_status(&self) -> Option<&str> {
        self.payload.get("status").and_then(Value::as_str)
    }

    /// The inserted row carried by a `postgres_changes` INSERT event.
    pub fn inserted_record(&self) -> Option<&Value> {
        if self.event != events::POSTGRES_CHANGES {
            return None;
        }
        let data = self.payload.get("data")?;
        let kind = data
            .get("type")
            .or_else(|| data.get("eventType"))
            .and_then(Value::as_str)?;
        if kind != "INSERT" {
            return None;
        }
        data.get("record").or_else(|| data.get("new"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inserted_record() {
        let msg: PhoenixMessage = serde_json::from_value(json!({
            "topic": "realtime:notifications",
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "INSERT",
                    "schema": "public",
                    "table": "notifications",
                    "record": { "titulo": "Nuevo pedido" },
                    "commit_timestamp": "2024-05-01T10:00:00Z"
                },
                "ids": [1]
            },
            "ref": null
        }))
        .unwrap();
        assert_eq!(msg.inserted_record().unwrap()["titulo"], "Nuevo pedido");
    }

    #[test]
    fn test_update_is_ignored() {
        let msg = PhoenixMessage {
            topic: "realtime:notifications".into(),
            event: events::POSTGRES_CHANGES.into(),
            payload: json!({ "data": { "type": "UPDATE", "record": {} } }),
            reference: None,
            join_ref: None,
        };
        assert!(msg.inserted_record().is_none());
    }

    #[test]
    fn test_reply_status() {
        let msg: PhoenixMessage = serde_json::from_value(json!({
            "topic": "realtime:notifications",
            "event": "phx_reply",
            "payload": { "status": "ok", "response": {} },
            "ref": "1"
        }))
        .unwrap();
        assert!(msg.is_reply_to("1"));
        assert_eq!(msg.reply_status(), Some("ok"));
    }
}
