//! `FlipmatchServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → registry → rooms.

use std::sync::Arc;

use flipmatch_protocol::JsonCodec;
use flipmatch_room::{RoomConfig, RoomRegistry};
use flipmatch_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::FlipmatchError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// The registry is the only mutable piece; it is locked for map mutation
/// and routing lookups, never across room broadcasts.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) room_config: RoomConfig,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a flipmatch server.
///
/// # Example
///
/// ```rust,ignore
/// let server = FlipmatchServer::builder()
///     .bind("0.0.0.0:5000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct FlipmatchServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl FlipmatchServerBuilder {
    /// A builder with default settings: localhost, stock eight-pair board.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Address to listen on.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the room configuration new rooms are created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the transport and builds the server.
    pub async fn build(self) -> Result<FlipmatchServer, FlipmatchError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new()),
            room_config: self.room_config,
            codec: JsonCodec,
        });

        Ok(FlipmatchServer { transport, state })
    }
}

impl Default for FlipmatchServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running flipmatch game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FlipmatchServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl FlipmatchServer {
    /// Starts a fresh builder.
    pub fn builder() -> FlipmatchServerBuilder {
        FlipmatchServerBuilder::new()
    }

    /// The address the server actually bound to (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop: each connection gets its own handler task.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), FlipmatchError> {
        tracing::info!("flipmatch server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
