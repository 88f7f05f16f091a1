//! Room-based WebSocket Message Relay Library
//!
//! Clients open a WebSocket, join a named room, and every chat message is
//! relayed to all members of that room, the sender included.
//!
//! # Features
//! - Implicit rooms: created by the first join, gone with the last member
//! - Per-recipient envelopes with an `isOwn` flag
//! - Join and departure announcements to room peers
//! - Pluggable wire encoding (`WireCodec`, JSON by default)
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the `Registry`
//! - Each connection has a `handler` task communicating with the relay
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use room_relay::{handle_connection, JsonCodec, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx, JsonCodec));
//!     }
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod server;
pub mod types;

pub use config::Config;
pub use connection::Connection;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::{ClientRequest, Envelope, EnvelopeKind, JsonCodec, WireCodec};
pub use registry::Registry;
pub use server::{RelayServer, ServerCommand};
pub use types::{ConnectionId, HandleId, RoomId};
