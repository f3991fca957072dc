//! Wire protocol for flipmatch.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Actions** ([`ClientAction`]) — what clients may ask for.
//! - **Events** ([`ServerEvent`]) — what the server broadcasts back.
//! - **Types** ([`RoomCode`], [`Recipient`]) — the identities those
//!   messages are keyed and routed by.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//!
//! The protocol layer sits between transport (raw frames) and the room
//! layer (game rules). It knows nothing about sockets or boards — only
//! about message shapes.

mod codec;
mod error;
mod event;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::{ClientAction, ServerEvent};
pub use types::{Recipient, RoomCode};

// Connection identity is assigned by the transport; re-exported here so the
// room and gateway layers need only one import path for wire-adjacent types.
pub use flipmatch_transport::ConnectionId;
