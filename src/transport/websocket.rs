//! WebSocket transport
//!
//! Accepts TCP connections, upgrades them, and gives each client:
//! - a `Connection` registered with the hub (anonymous until it sends `auth`)
//! - a writer task draining the connection's channel into the socket
//! - a reader loop decoding JSON requests into hub operations
//!
//! When either side ends, the connection is removed from the hub exactly
//! once. That drops its channel sender, which in turn lets the writer flush
//! what is queued and close the socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::config::Settings;
use crate::connection::Connection;
use crate::hub::{self, ServerMessage, SharedHub};
use crate::transport::handler::handle_client_message;
use crate::utils::Result;

/// Binds `addr` and serves WebSocket clients until the process ends.
pub async fn start_websocket_server(addr: &str, hub: SharedHub, settings: Settings) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, hub, settings).await
}

/// Serves WebSocket clients on an already bound listener.
pub async fn serve(listener: TcpListener, hub: SharedHub, settings: Settings) -> Result<()> {
    let jwt_secret: Arc<str> = settings.server.jwt_secret.into();

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("accept failed: {e}");
                continue;
            }
        };
        debug!(%peer, "incoming connection");
        spawn(handle_connection(stream, hub.clone(), jwt_secret.clone()));
    }
}

async fn handle_connection(stream: TcpStream, hub: SharedHub, jwt_secret: Arc<str>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let connection = Connection::new(tx);
    let connection_id = connection.id.clone();

    let registered = hub::lock(&hub).and_then(|mut hub| hub.register_connection(connection));
    if let Err(e) = registered {
        warn!("rejecting connection: {e}");
        if let Ok(json) = serde_json::to_string(&ServerMessage::error(e.to_string())) {
            let _ = ws_sender.send(WsMessage::text(json)).await;
        }
        let _ = ws_sender.close().await;
        return;
    }
    info!(connection = %connection_id, "connected");

    let cleanup_called = Arc::new(AtomicBool::new(false));
    let do_cleanup = {
        let hub = hub.clone();
        let connection_id = connection_id.clone();
        let cleanup_called = cleanup_called.clone();

        move || {
            if cleanup_called.swap(true, Ordering::SeqCst) {
                return;
            }
            match hub::lock(&hub) {
                Ok(mut hub) => {
                    hub.remove_connection(&connection_id);
                }
                Err(e) => error!(connection = %connection_id, "cleanup failed: {e}"),
            }
        }
    };

    let writer = {
        let connection_id = connection_id.clone();
        let do_cleanup = do_cleanup.clone();

        spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = ws_sender.send(frame).await {
                    warn!(connection = %connection_id, "failed to send: {e}");
                    break;
                }
            }
            let _ = ws_sender.close().await;
            do_cleanup();
            debug!(connection = %connection_id, "send loop closed");
        })
    };

    while let Some(Ok(frame)) = ws_receiver.next().await {
        let text = match frame {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        if let Err(e) = handle_client_message(&hub, &connection_id, text.as_str(), &jwt_secret) {
            warn!(connection = %connection_id, "request failed: {e}");
            let reported = hub::lock(&hub)
                .map(|hub| hub.send_to_connection(&connection_id, &ServerMessage::error(e.to_string())))
                .unwrap_or(false);
            if e.closes_connection() || !reported {
                break;
            }
        }
    }

    info!(connection = %connection_id, "disconnected");
    do_cleanup();
    let _ = writer.await;
}
