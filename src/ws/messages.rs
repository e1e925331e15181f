//! WebSocket message types: envelope and client commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Echo of the request id for responses; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds an envelope stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error envelope.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u16, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Client frame: an optional correlation id plus a command.
#[derive(Debug, Clone, Deserialize)]
pub struct WsRequest {
    /// Correlation id echoed in the response.
    #[serde(default)]
    pub id: String,
    /// The command itself.
    #[serde(flatten)]
    pub command: WsCommand,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific parkings.
    Subscribe {
        /// Parking ids to follow. `"*"` follows every parking.
        parking_ids: Vec<String>,
    },
    /// Stop following specific parkings.
    Unsubscribe {
        /// Parking ids to drop. `"*"` turns the wildcard off.
        parking_ids: Vec<String>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_with_and_without_id() {
        let Ok(with_id) = serde_json::from_str::<WsRequest>(
            r#"{"id":"r1","command":"subscribe","parking_ids":["a","*"]}"#,
        ) else {
            panic!("subscribe should parse");
        };
        assert_eq!(with_id.id, "r1");
        assert_eq!(
            with_id.command,
            WsCommand::Subscribe {
                parking_ids: vec!["a".to_string(), "*".to_string()]
            }
        );

        let Ok(bare) =
            serde_json::from_str::<WsRequest>(r#"{"command":"unsubscribe","parking_ids":[]}"#)
        else {
            panic!("unsubscribe should parse");
        };
        assert!(bare.id.is_empty());
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<WsRequest>(r#"{"command":"swap"}"#).is_err());
    }
}
