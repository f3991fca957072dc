//! Error types for the room layer.
//!
//! Only the variants a correctly behaving client can trigger are here —
//! everything else (wrong-turn flips, re-flips, stale starts) is a silent
//! no-op, not an error. The `Display` strings are user-facing: the gateway
//! forwards them verbatim inside `join_error` / `start_error` events.

use flipmatch_protocol::RoomCode;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room under this code.
    #[error("Room code '{0}' not found.")]
    NotFound(RoomCode),

    /// The room's membership is frozen.
    #[error("Game has already started.")]
    AlreadyStarted,

    /// Another player in the room has this name.
    #[error("Username already taken in this room.")]
    UsernameTaken,

    /// The creator tried to start alone.
    #[error("You need at least 2 players to start the game.")]
    NotEnoughPlayers,

    /// The room's command channel is gone — it is being torn down.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
