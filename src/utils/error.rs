//! The `error` module defines the error type shared across `chathub`.
//!
//! Room operations never fail for membership reasons (joining twice or
//! leaving a room one is not in are no-ops), so most variants describe
//! malformed client input, identity problems, or transport failures.

use thiserror::Error;

use crate::connection::ConnectionId;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("connection limit of {0} reached")]
    CapacityReached(usize),

    #[error("must authenticate first")]
    Unauthenticated,

    #[error("authentication failed")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("could not sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid client message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("hub state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// Whether the transport should drop the connection after reporting
    /// this error to the client.
    pub fn closes_connection(&self) -> bool {
        matches!(self, HubError::InvalidToken(_))
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
