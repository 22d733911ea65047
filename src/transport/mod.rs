//! The `transport` module speaks WebSocket to clients.
//!
//! It defines the JSON protocol, runs the server loop, and forwards each
//! decoded request to the hub.

pub mod handler;
pub mod protocol;
pub mod websocket;

pub use handler::handle_client_message;
pub use websocket::{serve, start_websocket_server};

#[cfg(test)]
mod tests;
