//! Connection registry
//!
//! The single source of truth for who is connected and which room they are
//! in. Keyed by transport handle; a per-room index keeps `members_of` from
//! scanning every connection.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::mpsc;

use crate::connection::Connection;
use crate::message::Envelope;
use crate::types::{ConnectionId, HandleId, RoomId};

/// Live connections and their room assignments
///
/// Rooms are not stored as entities: an index entry exists while at least
/// one connection is assigned to it and is dropped with its last member.
#[derive(Debug, Default)]
pub struct Registry {
    /// All registered connections: HandleId -> Connection
    connections: HashMap<HandleId, Connection>,
    /// Room index: RoomId -> members ordered by ConnectionId
    rooms: HashMap<RoomId, BTreeMap<ConnectionId, HandleId>>,
    /// Last allocated connection number
    last_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh handle as an unjoined connection
    pub fn register(
        &mut self,
        handle: HandleId,
        sender: mpsc::UnboundedSender<Envelope>,
    ) -> ConnectionId {
        self.last_id += 1;
        let id = ConnectionId(self.last_id);
        self.connections
            .insert(handle, Connection::new(handle, id, sender));
        id
    }

    /// Set or overwrite the room of `handle`
    ///
    /// Returns the room the connection was in before, if any. Unknown
    /// handles are ignored.
    pub fn assign_room(&mut self, handle: HandleId, room: RoomId) -> Option<RoomId> {
        let conn = self.connections.get_mut(&handle)?;
        let previous = conn.room.replace(room.clone());

        if let Some(old) = &previous {
            Self::unindex(&mut self.rooms, old, conn.id);
        }
        self.rooms.entry(room).or_default().insert(conn.id, handle);

        previous
    }

    /// Point lookup by handle
    pub fn lookup(&self, handle: HandleId) -> Option<&Connection> {
        self.connections.get(&handle)
    }

    /// Snapshot of every connection currently assigned to `room`
    ///
    /// The returned records are owned copies, so later registry mutations
    /// do not affect a snapshot that is being iterated.
    pub fn members_of(&self, room: &RoomId) -> Vec<Connection> {
        let Some(members) = self.rooms.get(room) else {
            return Vec::new();
        };

        members
            .values()
            .filter_map(|handle| self.connections.get(handle))
            .cloned()
            .collect()
    }

    /// Remove `handle`, returning its record
    ///
    /// Idempotent: a second call for the same handle returns `None`.
    pub fn unregister(&mut self, handle: HandleId) -> Option<Connection> {
        let conn = self.connections.remove(&handle)?;
        if let Some(room) = &conn.room {
            Self::unindex(&mut self.rooms, room, conn.id);
        }
        Some(conn)
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn unindex(
        rooms: &mut HashMap<RoomId, BTreeMap<ConnectionId, HandleId>>,
        room: &RoomId,
        id: ConnectionId,
    ) {
        if let Some(members) = rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                rooms.remove(room);
            }
        }
    }
}
