//! A `Room` is a named set of connection ids. Rooms have no lifecycle of
//! their own: the hub creates one on first join and prunes it once empty.
//!
//! Callers must synchronize access (the hub lock) when changing membership.

use std::collections::HashSet;

use crate::connection::ConnectionId;

#[derive(Debug, Default)]
pub struct Room {
    pub name: String,
    pub members: HashSet<ConnectionId>,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashSet::new(),
        }
    }

    /// Adds a member. Returns `false` if it was already present.
    pub fn join(&mut self, id: ConnectionId) -> bool {
        self.members.insert(id)
    }

    /// Removes a member. Returns `false` if it was not present.
    pub fn leave(&mut self, id: &ConnectionId) -> bool {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
