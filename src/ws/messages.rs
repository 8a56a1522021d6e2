//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EventType;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; the event id for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server-originated message stamped now.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message with a numeric code.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u16, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    /// Serializes the message, or `None` if serialization fails.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client enriched casino event.
    Event,
    /// Server → Client notice that the event source is exhausted.
    Shutdown,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send in the `payload` of a
/// [`WsMessageType::Command`] message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Narrow the feed to these event types and players.
    Subscribe {
        /// Event types to receive. Empty keeps every type.
        #[serde(default)]
        event_types: Vec<EventType>,
        /// Players to receive. Empty keeps every player.
        #[serde(default)]
        player_ids: Vec<u64>,
    },
    /// Remove event types and players from the filter.
    Unsubscribe {
        /// Event types to drop from the filter.
        #[serde(default)]
        event_types: Vec<EventType>,
        /// Players to drop from the filter.
        #[serde(default)]
        player_ids: Vec<u64>,
    },
    /// Clear the filter.
    Reset,
    /// Fetch the combined statistics.
    GetStats,
}
