use serde::{Deserialize, Serialize};

pub use crate::hub::ServerMessage;

/// Requests a client can send, one JSON object per text frame, tagged by
/// `"type"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Auth {
        token: String,
    },
    JoinRoom {
        room: String,
    },
    LeaveRoom {
        room: String,
    },
    SendMessageToRoom {
        room: String,
        user: String,
        message: String,
        #[serde(default)]
        avatar_url: String,
    },
    SendMessageToUser {
        user_id: String,
        user: String,
        message: String,
        #[serde(default)]
        avatar_url: String,
    },
}
