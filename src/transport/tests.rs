use crate::connection::{Connection, ConnectionId};
use crate::hub::{self, Hub, SYSTEM_SENDER, ServerMessage, SharedHub};
use crate::identity::issue_token;
use crate::transport::handle_client_message;
use crate::transport::protocol::ClientMessage;
use crate::utils::HubError;
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tungstenite::protocol::Message as WsMessage;

const SECRET: &str = "transport-secret";

fn setup() -> SharedHub {
    hub::shared(Hub::default())
}

fn connect(hub: &SharedHub) -> (ConnectionId, UnboundedReceiver<WsMessage>) {
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let connection = Connection::new(tx);
    let id = connection.id.clone();
    hub.lock().unwrap().register_connection(connection).unwrap();
    (id, rx)
}

fn send(hub: &SharedHub, id: &ConnectionId, msg: serde_json::Value) -> Result<(), HubError> {
    handle_client_message(hub, id, &msg.to_string(), SECRET)
}

fn next_event(rx: &mut UnboundedReceiver<WsMessage>) -> ServerMessage {
    match rx.try_recv().expect("no event queued") {
        WsMessage::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("Expected a text message, got {other:?}"),
    }
}

#[test]
fn test_client_message_wire_format() {
    let msg: ClientMessage = serde_json::from_value(json!({
        "type": "send_message_to_room",
        "room": "general",
        "user": "alice",
        "message": "hi"
    }))
    .unwrap();

    assert_eq!(
        msg,
        ClientMessage::SendMessageToRoom {
            room: "general".to_string(),
            user: "alice".to_string(),
            message: "hi".to_string(),
            avatar_url: String::new(),
        }
    );
}

#[tokio::test]
async fn test_handle_join_room() {
    let hub = setup();
    let (id, mut rx) = connect(&hub);

    send(&hub, &id, json!({ "type": "join_room", "room": "general" })).unwrap();

    assert!(hub.lock().unwrap().is_member("general", &id));
    assert_eq!(
        next_event(&mut rx),
        ServerMessage::receive(SYSTEM_SENDER, "anonymous has joined the room.", "")
    );
}

#[tokio::test]
async fn test_handle_leave_room() {
    let hub = setup();
    let (id, _rx) = connect(&hub);
    hub.lock().unwrap().join_room(&id, "general").unwrap();

    send(&hub, &id, json!({ "type": "leave_room", "room": "general" })).unwrap();

    assert!(!hub.lock().unwrap().is_member("general", &id));
}

#[tokio::test]
async fn test_handle_send_message_to_room() {
    let hub = setup();
    let (member, mut rx) = connect(&hub);
    let (sender, _rx_sender) = connect(&hub);
    hub.lock().unwrap().join_room(&member, "general").unwrap();
    next_event(&mut rx);

    send(
        &hub,
        &sender,
        json!({
            "type": "send_message_to_room",
            "room": "general",
            "user": "bob",
            "message": "hello",
            "avatar_url": "http://img/b.png"
        }),
    )
    .unwrap();

    assert_eq!(
        next_event(&mut rx),
        ServerMessage::receive("bob", "hello", "http://img/b.png")
    );
}

#[tokio::test]
async fn test_handle_invalid_json() {
    let hub = setup();
    let (id, _rx) = connect(&hub);

    let result = handle_client_message(&hub, &id, "{not json", SECRET);
    assert!(matches!(result, Err(HubError::Protocol(_))));

    let result = send(&hub, &id, json!({ "type": "shout", "room": "general" }));
    assert!(matches!(result, Err(HubError::Protocol(_))));
}

#[tokio::test]
async fn test_handle_blank_room() {
    let hub = setup();
    let (id, _rx) = connect(&hub);

    let result = send(&hub, &id, json!({ "type": "join_room", "room": "" }));
    assert!(matches!(result, Err(HubError::EmptyRoomName)));
}

#[tokio::test]
async fn test_handle_auth_then_join_uses_display_name() {
    let hub = setup();
    let (id, mut rx) = connect(&hub);
    let token = issue_token(SECRET, "u-1", Some("alice"), 1).unwrap();

    send(&hub, &id, json!({ "type": "auth", "token": token })).unwrap();
    assert_eq!(
        next_event(&mut rx),
        ServerMessage::Authenticated {
            user_id: "u-1".to_string(),
            display_name: "alice".to_string(),
        }
    );

    send(&hub, &id, json!({ "type": "join_room", "room": "general" })).unwrap();
    assert_eq!(
        next_event(&mut rx),
        ServerMessage::receive(SYSTEM_SENDER, "alice has joined the room.", "")
    );
}

#[tokio::test]
async fn test_handle_auth_with_bad_token() {
    let hub = setup();
    let (id, mut rx) = connect(&hub);

    let result = send(&hub, &id, json!({ "type": "auth", "token": "invalid.token.here" }));

    let err = result.unwrap_err();
    assert!(err.closes_connection());
    assert_eq!(err.to_string(), "authentication failed");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_handle_direct_message() {
    let hub = setup();
    let (alice, _rx_alice) = connect(&hub);
    let (bob, mut rx_bob) = connect(&hub);

    let request = json!({
        "type": "send_message_to_user",
        "user_id": "u-bob",
        "user": "alice",
        "message": "psst"
    });
    let result = send(&hub, &alice, request.clone());
    assert!(matches!(result, Err(HubError::Unauthenticated)));

    let token = issue_token(SECRET, "u-alice", Some("alice"), 1).unwrap();
    send(&hub, &alice, json!({ "type": "auth", "token": token })).unwrap();
    let token = issue_token(SECRET, "u-bob", Some("bob"), 1).unwrap();
    send(&hub, &bob, json!({ "type": "auth", "token": token })).unwrap();
    next_event(&mut rx_bob);

    send(&hub, &alice, request).unwrap();

    match next_event(&mut rx_bob) {
        ServerMessage::ReceiveDirectMessage(msg) => {
            assert_eq!(msg.sender_user_id, "u-alice");
            assert_eq!(msg.sender_name, "alice");
            assert_eq!(msg.message, "psst");
            assert_eq!(msg.avatar_url, "");
        }
        other => panic!("Expected a direct message, got {other:?}"),
    }
}
