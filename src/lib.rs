//! # chathub
//!
//! `chathub` is an in-memory chat room server speaking JSON over WebSockets.
//! Clients join named rooms, receive a system announcement when members come
//! and go, and broadcast messages to everyone currently in a room. Messages
//! are fire-and-forget: nothing is stored or replayed.
//!
//! ## Core Modules
//!
//! - `hub`: room membership, fan-out, and the events pushed to clients.
//! - `connection`: a connected client as the hub tracks it.
//! - `identity`: JWT verification yielding a user id and display name.
//! - `config`: layered file/environment configuration.
//! - `transport`: the WebSocket server and client protocol.
//! - `utils`: error type and logging setup.

pub mod config;
pub mod connection;
pub mod hub;
pub mod identity;
pub mod transport;
pub mod utils;
