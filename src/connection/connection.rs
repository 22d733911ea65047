use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::identity::Identity;

pub type ConnectionId = String;

/// A connected WebSocket client as tracked by the hub.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub sender: UnboundedSender<WsMessage>,
    pub identity: Identity,
}

impl Connection {
    /// Creates an anonymous connection with a fresh UUID identifier.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            identity: Identity::anonymous(),
        }
    }

    /// Queues a frame for the writer task. Returns `false` once the
    /// client's writer has gone away.
    pub fn push(&self, frame: WsMessage) -> bool {
        self.sender.send(frame).is_ok()
    }
}
