//! Events the server pushes to clients.
//!
//! Every frame is a JSON object tagged by `"type"`:
//!
//! ```json
//! {"type":"receive_message","user":"alice","message":"hi","avatar_url":""}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author shown on join/leave announcements.
pub const SYSTEM_SENDER: &str = "System";

/// A user-targeted message. Delivered to every connection of the receiver
/// and then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_user_id: String,
    pub sender_name: String,
    pub receiver_user_id: String,
    pub message: String,
    pub avatar_url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ReceiveMessage {
        user: String,
        message: String,
        avatar_url: String,
    },
    ReceiveDirectMessage(ChatMessage),
    Authenticated {
        user_id: String,
        display_name: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn receive(user: &str, message: &str, avatar_url: &str) -> Self {
        ServerMessage::ReceiveMessage {
            user: user.to_string(),
            message: message.to_string(),
            avatar_url: avatar_url.to_string(),
        }
    }

    pub(crate) fn joined(display_name: &str) -> Self {
        Self::receive(
            SYSTEM_SENDER,
            &format!("{display_name} has joined the room."),
            "",
        )
    }

    pub(crate) fn left(display_name: &str) -> Self {
        Self::receive(
            SYSTEM_SENDER,
            &format!("{display_name} has left the room."),
            "",
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
