//! JSON serialization for socket frames.

use backoffice_core::result::AppResult;

use super::envelope::PhoenixMessage;

/// Serialize an outbound frame to JSON text.
pub fn encode(msg: &PhoenixMessage) -> AppResult<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Deserialize an inbound frame from JSON text.
pub fn decode(text: &str) -> AppResult<PhoenixMessage> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::builder;

    #[test]
    fn test_encode_uses_ref_key() {
        let text = encode(&builder::heartbeat("3")).unwrap();
        assert!(text.contains("\"ref\":\"3\""));
        assert!(!text.contains("join_ref"));
        assert_eq!(decode(&text).unwrap(), builder::heartbeat("3"));
    }
}
