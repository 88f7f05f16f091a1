//! Message protocol definitions
//!
//! Inbound requests and outbound envelopes, plus the `WireCodec` seam that
//! turns them into frames. `JsonCodec` is the default encoding.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::{ConnectionId, RoomId};

/// Sender label used on every system envelope
pub const SYSTEM_SENDER: &str = "System";

/// Client → Server request
///
/// Adjacently tagged: `{"type": "join", "payload": {"roomId": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Enter a room (or move to another one)
    Join {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Broadcast text to the current room
    Chat { message: String },
}

/// Kind discriminator of an outbound envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    System,
    Chat,
}

/// Server → Client envelope
///
/// Built once per recipient. `is_own` is relative to the recipient: it is
/// true only when the recipient caused the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub message: String,
    pub sender: String,
    pub timestamp: String,
    #[serde(rename = "isOwn")]
    pub is_own: bool,
}

impl Envelope {
    /// System envelope stamped with the current time
    pub fn system(message: String, is_own: bool) -> Self {
        Self {
            kind: EnvelopeKind::System,
            message,
            sender: SYSTEM_SENDER.to_string(),
            timestamp: now_iso8601(),
            is_own,
        }
    }

    /// Chat envelope stamped with the current time
    pub fn chat(message: String, sender: ConnectionId, is_own: bool) -> Self {
        Self {
            kind: EnvelopeKind::Chat,
            message,
            sender: sender.to_string(),
            timestamp: now_iso8601(),
            is_own,
        }
    }

    /// Confirmation sent to a connection that just joined `room`
    pub fn joined(room: &RoomId) -> Self {
        Self::system(format!("You have joined {}", room), true)
    }

    /// Announcement to peers that `id` joined `room`
    pub fn peer_joined(id: ConnectionId, room: &RoomId) -> Self {
        Self::system(format!("{} joined {}", id, room), false)
    }

    /// Announcement to peers that `id` left `room`
    pub fn peer_left(id: ConnectionId, room: &RoomId) -> Self {
        Self::system(format!("{} left {}", id, room), false)
    }

    /// Same envelope addressed to a different recipient
    pub fn with_is_own(&self, is_own: bool) -> Self {
        Self {
            is_own,
            ..self.clone()
        }
    }
}

/// UTC timestamp in the `2026-01-01T00:00:00.000Z` form
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wire encoding used by the transport layer
///
/// The relay core only ever sees decoded `ClientRequest`s and produces
/// `Envelope`s; how they become frames is up to the codec.
pub trait WireCodec: Clone + Send + Sync + 'static {
    /// Encode an outbound envelope into a text frame
    fn encode(&self, envelope: &Envelope) -> Result<String, AppError>;

    /// Decode an inbound text frame
    fn decode(&self, raw: &str) -> Result<ClientRequest, AppError>;
}

/// JSON wire encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl WireCodec for JsonCodec {
    fn encode(&self, envelope: &Envelope) -> Result<String, AppError> {
        Ok(serde_json::to_string(envelope)?)
    }

    fn decode(&self, raw: &str) -> Result<ClientRequest, AppError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_request_decode() {
        let json = r#"{"type": "join", "payload": {"roomId": "Room101"}}"#;
        let req = JsonCodec.decode(json).unwrap();
        assert_eq!(
            req,
            ClientRequest::Join {
                room_id: "Room101".to_string()
            }
        );
    }

    #[test]
    fn test_chat_request_decode() {
        let json = r#"{"type": "chat", "payload": {"message": "hi"}}"#;
        let req = JsonCodec.decode(json).unwrap();
        assert_eq!(
            req,
            ClientRequest::Chat {
                message: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_requests_rejected() {
        assert!(JsonCodec.decode(r#"{"type": "typing"}"#).is_err());
        assert!(JsonCodec.decode(r#"{"type": "join"}"#).is_err());
        assert!(JsonCodec
            .decode(r#"{"type": "chat", "payload": {"text": "hi"}}"#)
            .is_err());
        assert!(JsonCodec.decode("not json").is_err());
    }

    #[test]
    fn test_envelope_wire_field_names() {
        let env = Envelope::chat("hi".to_string(), ConnectionId(1), true);
        let json = JsonCodec.encode(&env).unwrap();
        assert!(json.contains("\"type\":\"chat\""));
        assert!(json.contains("\"message\":\"hi\""));
        assert!(json.contains("\"sender\":\"user_1\""));
        assert!(json.contains("\"isOwn\":true"));
        assert!(json.contains("\"timestamp\":"));
    }

    #[test]
    fn test_system_envelope_texts() {
        let room = RoomId::from("Room101");

        let joined = Envelope::joined(&room);
        assert_eq!(joined.kind, EnvelopeKind::System);
        assert_eq!(joined.message, "You have joined Room101");
        assert_eq!(joined.sender, SYSTEM_SENDER);
        assert!(joined.is_own);

        let peer = Envelope::peer_joined(ConnectionId(2), &room);
        assert_eq!(peer.message, "user_2 joined Room101");
        assert!(!peer.is_own);

        let left = Envelope::peer_left(ConnectionId(2), &room);
        assert_eq!(left.message, "user_2 left Room101");
        assert!(!left.is_own);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_iso8601();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        // yyyy-mm-ddThh:mm:ss.mmmZ
        assert_eq!(ts.len(), 24);
    }
}
