//! Builders for outbound Phoenix frames.

use serde_json::json;

use super::envelope::{PhoenixMessage, events};

/// Topic of the socket-level heartbeat.
pub const PHOENIX_TOPIC: &str = "phoenix";

/// Channel topic for inserts on `table`.
pub fn topic_for(table: &str) -> String {
    format!("realtime:{table}")
}

/// Join a channel listening for INSERT events on `schema.table`.
pub fn join(
    topic: &str,
    schema: &str,
    table: &str,
    access_token: &str,
    reference: &str,
) -> PhoenixMessage {
    PhoenixMessage {
        topic: topic.to_string(),
        event: events::JOIN.to_string(),
        payload: json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [
                    { "event": "INSERT", "schema": schema, "table": table }
                ]
            },
            "access_token": access_token
        }),
        reference: Some(reference.to_string()),
        join_ref: Some(reference.to_string()),
    }
}

/// Socket heartbeat.
pub fn heartbeat(reference: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: PHOENIX_TOPIC.to_string(),
        event: events::HEARTBEAT.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
        join_ref: None,
    }
}

/// Leave a channel.
pub fn leave(topic: &str, reference: &str, join_ref: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: topic.to_string(),
        event: events::LEAVE.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
        join_ref: Some(join_ref.to_string()),
    }
}
