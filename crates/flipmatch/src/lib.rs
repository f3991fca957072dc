//! # flipmatch
//!
//! Server for a real-time multiplayer matching-pairs game. Players open a
//! room under a short code, friends join by code, and the server arbitrates
//! turns, flips, scoring, and game end while broadcasting every change to
//! the whole room.
//!
//! The server is authoritative: the board lives server-side, turn order is
//! enforced per connection, and clients only ever *ask* — `ClientAction` in,
//! `ServerEvent` out, over a room-scoped WebSocket fan-out.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use flipmatch::FlipmatchServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), flipmatch::FlipmatchError> {
//!     let server = FlipmatchServer::builder()
//!         .bind("0.0.0.0:5000")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::FlipmatchError;
pub use server::{FlipmatchServer, FlipmatchServerBuilder};

// The layer crates are re-exported for embedders that want to drive the
// registry directly or speak the wire types in tests.
pub use flipmatch_protocol as protocol;
pub use flipmatch_room as room;
