//! CLI for chathub
//!
//! Subcommands:
//! - `server`: run the WebSocket server
//! - `client`: join a room, send one message, print what comes back
//! - `token`: mint a development token signed with the configured secret

use std::time::Duration;

use chathub::config::{load_config, load_config_from};
use chathub::hub::{self, Hub, ServerMessage};
use chathub::identity::issue_token;
use chathub::transport::start_websocket_server;
use chathub::utils::logging;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chathub")]
enum Command {
    /// Start the WebSocket server
    Server {
        /// Config file to read instead of config/default
        #[arg(long)]
        config: Option<String>,
    },
    /// Run a smoke-test client against a running server
    Client {
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        #[arg(long, default_value = "general")]
        room: String,
        #[arg(long, default_value = "Hello from chathub")]
        message: String,
        /// Name shown as the message author
        #[arg(long, default_value = "cli")]
        name: String,
        /// Token to authenticate with before joining
        #[arg(long)]
        token: Option<String>,
    },
    /// Print a signed token for local testing
    Token {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

#[tokio::main]
async fn main() {
    let cmd = Command::parse();

    let result = match cmd {
        Command::Server { config } => run_server(config.as_deref()).await,
        Command::Client {
            url,
            room,
            message,
            name,
            token,
        } => {
            logging::init("info");
            run_client(&url, &room, &message, &name, token.as_deref()).await
        }
        Command::Token {
            user_id,
            name,
            hours,
        } => run_token(&user_id, name.as_deref(), hours),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("chathub: {e}");
        std::process::exit(1);
    }
}

async fn run_server(config: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    logging::init(&settings.log.level);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let hub = hub::shared(Hub::new(settings.hub.clone()));

    tokio::select! {
        result = start_websocket_server(&addr, hub, settings) => {
            result?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_client(
    url: &str,
    room: &str,
    message: &str,
    name: &str,
    token: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    use futures_util::{SinkExt, StreamExt};
    use serde_json::json;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    let (mut ws_stream, _response) = connect_async(url).await?;

    if let Some(token) = token {
        let auth = json!({ "type": "auth", "token": token });
        ws_stream.send(WsMessage::text(auth.to_string())).await?;
    }

    let join = json!({ "type": "join_room", "room": room });
    ws_stream.send(WsMessage::text(join.to_string())).await?;

    let send = json!({
        "type": "send_message_to_room",
        "room": room,
        "user": name,
        "message": message
    });
    ws_stream.send(WsMessage::text(send.to_string())).await?;

    // Print events until our own message comes back.
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), ws_stream.next()).await?;
        let Some(frame) = next else { break };
        let frame = frame?;
        let Ok(text) = frame.to_text() else { continue };
        println!("{text}");

        if let Ok(ServerMessage::ReceiveMessage { user, message: body, .. }) =
            serde_json::from_str::<ServerMessage>(text)
            && user == name
            && body == message
        {
            break;
        }
    }

    ws_stream.close(None).await?;
    Ok(())
}

fn run_token(
    user_id: &str,
    name: Option<&str>,
    hours: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_config()?;
    let token = issue_token(&settings.server.jwt_secret, user_id, name, hours)?;
    println!("{token}");
    Ok(())
}
