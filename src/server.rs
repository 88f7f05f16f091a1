//! RelayServer actor implementation
//!
//! The central actor that owns the connection registry. Transport tasks
//! forward one event at a time over an mpsc channel; each event is handled
//! to completion before the next, so the registry needs no lock.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::connection::Connection;
use crate::message::{ClientRequest, Envelope};
use crate::registry::Registry;
use crate::types::{ConnectionId, HandleId, RoomId};

/// Events sent from transport handlers to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New transport session
    Connect {
        handle: HandleId,
        sender: mpsc::UnboundedSender<Envelope>,
    },
    /// Decoded request from a session
    Request {
        handle: HandleId,
        request: ClientRequest,
    },
    /// Transport closed
    Disconnect { handle: HandleId },
    /// Transport failed; treated as a close
    Error { handle: HandleId, cause: String },
}

/// The relay actor
pub struct RelayServer {
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a new RelayServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!(
            "RelayServer shutting down with {} connections",
            self.registry.len()
        );
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { handle, sender } => {
                self.handle_connect(handle, sender);
            }
            ServerCommand::Request { handle, request } => match request {
                ClientRequest::Join { room_id } => {
                    self.handle_join(handle, RoomId::from(room_id));
                }
                ClientRequest::Chat { message } => {
                    self.handle_chat(handle, message);
                }
            },
            ServerCommand::Disconnect { handle } => {
                self.handle_departure(handle);
            }
            ServerCommand::Error { handle, cause } => {
                self.handle_error(handle, cause);
            }
        }
    }

    /// Handle new transport session
    fn handle_connect(&mut self, handle: HandleId, sender: mpsc::UnboundedSender<Envelope>) {
        let id = self.registry.register(handle, sender);
        info!("{} connected", id);
        debug!(
            "Total connections: {}, Total rooms: {}",
            self.registry.len(),
            self.registry.room_count()
        );
    }

    /// Handle a join request
    ///
    /// Moving to a different room announces the departure to the old room
    /// first. Re-joining the current room only repeats the confirmation.
    fn handle_join(&mut self, handle: HandleId, room: RoomId) {
        let Some(conn) = self.registry.lookup(handle) else {
            return;
        };
        let id = conn.id;

        match self.registry.assign_room(handle, room.clone()) {
            Some(previous) if previous == room => {
                debug!("{} re-joined room {}", id, room);
                self.confirm_join(handle, &room);
                return;
            }
            Some(previous) => {
                info!("{} left room {} for {}", id, previous, room);
                self.announce_departure(id, &previous);
            }
            None => {}
        }

        info!("{} joined room {}", id, room);
        self.confirm_join(handle, &room);

        for member in self
            .registry
            .members_of(&room)
            .iter()
            .filter(|m| m.handle != handle)
        {
            deliver(member, Envelope::peer_joined(id, &room));
        }
    }

    /// Handle a chat request
    fn handle_chat(&mut self, handle: HandleId, message: String) {
        let Some(sender) = self.registry.lookup(handle) else {
            return;
        };
        let Some(room) = sender.room.clone() else {
            debug!("Dropping chat from unjoined {}", sender.id);
            return;
        };

        let members = self.registry.members_of(&room);
        info!(
            "Broadcasting message from {} to room {} ({} members)",
            sender.id,
            room,
            members.len()
        );

        let envelope = Envelope::chat(message, sender.id, false);
        for member in &members {
            deliver(member, envelope.with_is_own(member.handle == handle));
        }
    }

    /// Handle transport close
    fn handle_departure(&mut self, handle: HandleId) {
        let Some(departed) = self.registry.unregister(handle) else {
            return;
        };

        info!("{} disconnected", departed.id);

        if let Some(room) = &departed.room {
            self.announce_departure(departed.id, room);
        }

        debug!(
            "Total connections: {}, Total rooms: {}",
            self.registry.len(),
            self.registry.room_count()
        );
    }

    /// Handle transport failure
    fn handle_error(&mut self, handle: HandleId, cause: String) {
        match self.registry.lookup(handle) {
            Some(conn) => error!("Transport error for {}: {}", conn.id, cause),
            None => debug!("Transport error for released handle {}: {}", handle, cause),
        }
        self.handle_departure(handle);
    }

    /// Helper: Confirm membership to the requester
    fn confirm_join(&self, handle: HandleId, room: &RoomId) {
        if let Some(conn) = self.registry.lookup(handle) {
            deliver(conn, Envelope::joined(room));
        }
    }

    /// Helper: Tell the current members of `room` that `id` left
    fn announce_departure(&self, id: ConnectionId, room: &RoomId) {
        for member in &self.registry.members_of(room) {
            deliver(member, Envelope::peer_left(id, room));
        }
    }
}

/// Queue an envelope, logging instead of propagating a failure
fn deliver(conn: &Connection, envelope: Envelope) {
    if let Err(e) = conn.send(envelope) {
        warn!("Skipping recipient {}: {}", conn.id, e);
    }
}
