//! Room lifecycle and game rules for flipmatch.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its own
//! board, roster, and turn state. The rules themselves live in a pure,
//! synchronous [`Room`] so they can be tested without a runtime.
//!
//! # Key types
//!
//! - [`Room`] — the state machine: membership, flips, scoring, rotation
//! - [`RoomRegistry`] — creates rooms, routes connections, evicts empties
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Phase`] — lifecycle: `Lobby` → `Playing` → `Over`
//! - [`RoomConfig`] — symbol set and player minimum

mod actor;
mod board;
mod code;
mod config;
mod error;
mod registry;
mod room;

pub use actor::{Departure, EventSender, RoomHandle, RoomInfo};
pub use board::build as build_board;
pub use config::{DEFAULT_SYMBOLS, Phase, RoomConfig};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{DisconnectOutcome, Outbound, Room};
