//! The `connection` module defines how the hub sees one connected client.
//!
//! A `Connection` pairs a unique identifier with the sending half of the
//! channel drained by that client's WebSocket writer task, plus whatever
//! identity the client has proven so far.

mod connection;

pub use connection::{Connection, ConnectionId};
