//! Connection record
//!
//! One live transport session: its handle, its server-assigned id, its
//! current room and the outbound queue that stands in for `send`.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::Envelope;
use crate::types::{ConnectionId, HandleId, RoomId};

/// Registered connection
#[derive(Debug, Clone)]
pub struct Connection {
    /// Transport handle identity (registry key)
    pub handle: HandleId,
    /// Server-assigned identifier
    pub id: ConnectionId,
    /// Current room, `None` until the first join
    pub room: Option<RoomId>,
    /// Relay → transport envelope queue
    pub sender: mpsc::UnboundedSender<Envelope>,
}

impl Connection {
    /// Create an unjoined connection
    pub fn new(
        handle: HandleId,
        id: ConnectionId,
        sender: mpsc::UnboundedSender<Envelope>,
    ) -> Self {
        Self {
            handle,
            id,
            room: None,
            sender,
        }
    }

    /// Queue an envelope for this connection
    ///
    /// Never waits and never drops while the transport task is alive; only
    /// a closed queue is reported back.
    pub fn send(&self, envelope: Envelope) -> Result<(), SendError> {
        self.sender
            .send(envelope)
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether this connection is in `room`
    pub fn is_in(&self, room: &RoomId) -> bool {
        self.room.as_ref() == Some(room)
    }
}
