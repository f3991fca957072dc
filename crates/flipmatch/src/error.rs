//! Unified error type for the flipmatch server.

use flipmatch_protocol::ProtocolError;
use flipmatch_room::RoomError;
use flipmatch_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FlipmatchError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, taken, already started).
    #[error(transparent)]
    Room(#[from] RoomError),
}
