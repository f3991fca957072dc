//! Transport layer for flipmatch: how client connections reach the server.
//!
//! The [`Transport`] and [`Connection`] traits hide the concrete network
//! protocol from everything above them; [`ConnectionId`] is the opaque
//! identity the room and gateway layers key on.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a live connection.
///
/// Assigned by the transport on accept, unique for the lifetime of the
/// process. Rooms bind usernames to this value, never to the socket itself,
/// so everything above the transport stays protocol-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Unwraps back to the raw id.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Source of new inbound connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type this transport produces.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Accepts the next inbound connection, waiting for one if necessary.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// One live, bidirectional connection.
///
/// `send` and `recv` lock independent halves of the underlying stream, so a
/// broadcast writer task and an inbound read loop never contend.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Delivers one message to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Yields the next message from the peer, or `Ok(None)` once the peer
    /// has closed cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Tears the connection down.
    async fn close(&self) -> Result<(), Self::Error>;

    /// This connection's identity.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_round_trips_raw_value() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display_format() {
        assert_eq!(ConnectionId::new(9).to_string(), "conn#9");
    }

    #[test]
    fn test_connection_id_usable_as_map_key() {
        use std::collections::HashMap;
        let map = HashMap::from([(ConnectionId::new(1), "ann"), (ConnectionId::new(2), "bo")]);
        assert_eq!(map[&ConnectionId::new(2)], "bo");
    }
}
