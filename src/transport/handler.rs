//! Maps decoded client requests onto hub operations.
//!
//! Kept apart from the socket loop so the whole request path can be driven
//! with plain channels.

use tracing::{debug, info};

use crate::connection::ConnectionId;
use crate::hub::{self, ServerMessage, SharedHub};
use crate::identity::verify_token;
use crate::transport::protocol::ClientMessage;
use crate::utils::Result;

/// Decodes one text frame from `connection_id` and applies it to the hub.
///
/// Replies (such as `authenticated`) are queued on the caller's own channel.
/// Errors are returned for the socket loop to report to the client.
pub fn handle_client_message(
    hub: &SharedHub,
    connection_id: &ConnectionId,
    text: &str,
    jwt_secret: &str,
) -> Result<()> {
    let request: ClientMessage = serde_json::from_str(text)?;

    match request {
        ClientMessage::Auth { token } => {
            let identity = verify_token(&token, jwt_secret)?;
            let reply = ServerMessage::Authenticated {
                user_id: identity.user_id.clone().unwrap_or_default(),
                display_name: identity.display_name.clone().unwrap_or_default(),
            };

            let mut hub = hub::lock(hub)?;
            hub.set_identity(connection_id, identity)?;
            hub.send_to_connection(connection_id, &reply);
            info!(connection = %connection_id, "authenticated");
        }
        ClientMessage::JoinRoom { room } => {
            hub::lock(hub)?.join_room(connection_id, &room)?;
        }
        ClientMessage::LeaveRoom { room } => {
            hub::lock(hub)?.leave_room(connection_id, &room)?;
        }
        ClientMessage::SendMessageToRoom {
            room,
            user,
            message,
            avatar_url,
        } => {
            let delivered = hub::lock(hub)?.send_to_room(&room, &user, &message, &avatar_url);
            debug!(connection = %connection_id, room = %room, delivered, "room message");
        }
        ClientMessage::SendMessageToUser {
            user_id,
            user,
            message,
            avatar_url,
        } => {
            let delivered =
                hub::lock(hub)?.send_to_user(connection_id, &user_id, &user, &message, &avatar_url)?;
            debug!(connection = %connection_id, receiver = %user_id, delivered, "direct message");
        }
    }

    Ok(())
}
