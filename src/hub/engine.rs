//! Hub engine
//!
//! In-memory state behind the chat service:
//! - registered connections and the identity each one proved
//! - named rooms and their member connection ids
//! - an index from user id to that user's live connections
//!
//! The API is synchronous and meant to sit behind `Arc<Mutex<Hub>>`.
//! Delivery only pushes onto each connection's unbounded channel, so the lock
//! is never held across network I/O. Fan-out is best-effort: a member whose
//! writer has gone away is skipped and the rest still receive the event.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::config::HubSettings;
use crate::connection::{Connection, ConnectionId};
use crate::hub::message::{ChatMessage, ServerMessage};
use crate::hub::room::Room;
use crate::identity::Identity;
use crate::utils::{HubError, Result};

#[derive(Debug, Default)]
pub struct Hub {
    rooms: HashMap<String, Room>,
    connections: HashMap<ConnectionId, Connection>,
    users: HashMap<String, HashSet<ConnectionId>>,
    settings: HubSettings,
}

impl Hub {
    pub fn new(settings: HubSettings) -> Self {
        Self {
            rooms: HashMap::new(),
            connections: HashMap::new(),
            users: HashMap::new(),
            settings,
        }
    }

    /// Registers a freshly accepted connection.
    pub fn register_connection(&mut self, connection: Connection) -> Result<()> {
        if self.connections.len() >= self.settings.max_connections {
            return Err(HubError::CapacityReached(self.settings.max_connections));
        }
        debug!(connection = %connection.id, "connection registered");
        self.connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    /// Drops a connection and its memberships. No "left" announcement is
    /// made; disconnects are silent. Returns the rooms it was removed from.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> Vec<String> {
        let Some(connection) = self.connections.remove(id) else {
            return Vec::new();
        };

        if let Some(user_id) = &connection.identity.user_id {
            self.unindex_user(user_id, id);
        }

        let mut left = Vec::new();
        for (name, room) in self.rooms.iter_mut() {
            if room.leave(id) {
                left.push(name.clone());
            }
        }
        self.rooms.retain(|_, room| !room.is_empty());

        info!(connection = %id, rooms = left.len(), "connection removed");
        left
    }

    /// Attaches a verified identity to a connection.
    pub fn set_identity(&mut self, id: &ConnectionId, identity: Identity) -> Result<()> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or_else(|| HubError::UnknownConnection(id.clone()))?;

        let previous = std::mem::replace(&mut connection.identity, identity);
        let current = connection.identity.user_id.clone();

        if let Some(user_id) = previous.user_id {
            self.unindex_user(&user_id, id);
        }
        if let Some(user_id) = current {
            self.users.entry(user_id).or_default().insert(id.clone());
        }
        Ok(())
    }

    /// Adds the connection to `room`, creating the room if needed.
    ///
    /// On a real transition every member, the newcomer included, receives a
    /// system "has joined" message. Returns `false` if it was already a
    /// member, in which case nothing is sent.
    pub fn join_room(&mut self, id: &ConnectionId, room: &str) -> Result<bool> {
        let room = validate_room_name(room)?;
        let display_name = self.display_name(id)?;

        let joined = self
            .rooms
            .entry(room.to_string())
            .or_insert_with(|| Room::new(room))
            .join(id.clone());

        if joined {
            info!(connection = %id, room, "joined room");
            self.broadcast(room, &ServerMessage::joined(&display_name));
        }
        Ok(joined)
    }

    /// Removes the connection from `room`.
    ///
    /// On a real transition the remaining members receive a system "has
    /// left" message. Returns `false` if it was not a member.
    pub fn leave_room(&mut self, id: &ConnectionId, room: &str) -> Result<bool> {
        let room = validate_room_name(room)?;
        let display_name = self.display_name(id)?;

        let Some(members) = self.rooms.get_mut(room) else {
            return Ok(false);
        };
        if !members.leave(id) {
            return Ok(false);
        }

        info!(connection = %id, room, "left room");
        if members.is_empty() {
            self.rooms.remove(room);
        } else {
            self.broadcast(room, &ServerMessage::left(&display_name));
        }
        Ok(true)
    }

    /// Broadcasts a chat message to every current member of `room`. The
    /// sender does not need to be a member. Returns how many connections the
    /// message was handed to.
    pub fn send_to_room(&self, room: &str, user: &str, message: &str, avatar_url: &str) -> usize {
        self.broadcast(room, &ServerMessage::receive(user, message, avatar_url))
    }

    /// Sends a direct message from the (authenticated) caller to every
    /// connection of `receiver_user_id`. An offline receiver is not an
    /// error; the returned count is simply zero.
    pub fn send_to_user(
        &self,
        sender: &ConnectionId,
        receiver_user_id: &str,
        user: &str,
        message: &str,
        avatar_url: &str,
    ) -> Result<usize> {
        let connection = self
            .connections
            .get(sender)
            .ok_or_else(|| HubError::UnknownConnection(sender.clone()))?;
        if !connection.identity.is_authenticated() {
            return Err(HubError::Unauthenticated);
        }
        let sender_user_id = connection.identity.user_id.clone().unwrap_or_default();

        let event = ServerMessage::ReceiveDirectMessage(ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender_user_id,
            sender_name: user.to_string(),
            receiver_user_id: receiver_user_id.to_string(),
            message: message.to_string(),
            avatar_url: avatar_url.to_string(),
            timestamp: chrono::Utc::now(),
        });

        let Some(targets) = self.users.get(receiver_user_id) else {
            debug!(receiver = receiver_user_id, "direct message to offline user");
            return Ok(0);
        };
        Ok(self.deliver(targets.iter(), &event))
    }

    /// Sends an event to a single connection, typically a reply to its own
    /// request. Returns `false` if the connection is gone.
    pub fn send_to_connection(&self, id: &ConnectionId, event: &ServerMessage) -> bool {
        self.deliver(std::iter::once(id), event) == 1
    }

    pub fn is_member(&self, room: &str, id: &ConnectionId) -> bool {
        self.rooms.get(room).is_some_and(|r| r.contains(id))
    }

    /// Current members of `room`; empty if the room does not exist.
    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|r| r.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn identity(&self, id: &ConnectionId) -> Option<&Identity> {
        self.connections.get(id).map(|c| &c.identity)
    }

    fn display_name(&self, id: &ConnectionId) -> Result<String> {
        let connection = self
            .connections
            .get(id)
            .ok_or_else(|| HubError::UnknownConnection(id.clone()))?;
        Ok(connection
            .identity
            .display_name_or(&self.settings.anonymous_name)
            .to_string())
    }

    fn broadcast(&self, room: &str, event: &ServerMessage) -> usize {
        match self.rooms.get(room) {
            Some(room) => {
                debug!(room = %room.name, members = room.members.len(), "broadcast");
                self.deliver(room.members.iter(), event)
            }
            None => {
                debug!(room, "broadcast to empty room");
                0
            }
        }
    }

    fn deliver<'a>(
        &self,
        targets: impl Iterator<Item = &'a ConnectionId>,
        event: &ServerMessage,
    ) -> usize {
        let frame = match serde_json::to_string(event) {
            Ok(json) => WsMessage::text(json),
            Err(e) => {
                warn!("failed to serialize event: {e}");
                return 0;
            }
        };

        let mut delivered = 0;
        for id in targets {
            match self.connections.get(id) {
                Some(connection) if connection.push(frame.clone()) => delivered += 1,
                Some(_) => warn!(connection = %id, "writer closed, skipping"),
                None => warn!(connection = %id, "no connection registered"),
            }
        }
        delivered
    }

    fn unindex_user(&mut self, user_id: &str, id: &ConnectionId) {
        if let Some(ids) = self.users.get_mut(user_id) {
            ids.remove(id);
            if ids.is_empty() {
                self.users.remove(user_id);
            }
        }
    }
}

fn validate_room_name(room: &str) -> Result<&str> {
    if room.trim().is_empty() {
        return Err(HubError::EmptyRoomName);
    }
    Ok(room)
}
