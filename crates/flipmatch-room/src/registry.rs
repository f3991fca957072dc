//! Room registry: owns the code → room mapping and its lifecycle.
//!
//! The registry is the single writer for room creation and eviction. A room
//! exists here iff it still has at least one player; when the last player
//! disconnects the entry is removed and the code becomes reusable.

use std::collections::HashMap;

use flipmatch_protocol::{ConnectionId, RoomCode};

use crate::actor::spawn_room;
use crate::{Departure, EventSender, RoomConfig, RoomError, RoomHandle, RoomInfo, code};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all live rooms and which room each connection is in.
pub struct RoomRegistry {
    /// Live rooms, keyed by join code.
    rooms: HashMap<RoomCode, RoomHandle>,

    /// Maps each connection to the room it is in. A connection is in at
    /// most one room at a time.
    connection_rooms: HashMap<ConnectionId, RoomCode>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            connection_rooms: HashMap::new(),
        }
    }

    /// Opens a new room for `conn` and returns its code.
    ///
    /// The code is redrawn until it misses every live room. The creator's
    /// event channel is subscribed immediately — the `room_created` event
    /// arrives on it once the actor is up.
    pub fn create_room(
        &mut self,
        conn: ConnectionId,
        username: String,
        config: RoomConfig,
        sender: EventSender,
    ) -> RoomCode {
        let code = loop {
            let candidate = code::generate();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let handle = spawn_room(
            code.clone(),
            config,
            conn,
            username,
            sender,
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle);
        self.connection_rooms.insert(conn, code.clone());
        tracing::info!(room = %code, %conn, "room created");
        code
    }

    /// Adds `conn` to the room under `code`.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] for a dead or unknown code, plus whatever
    /// the room itself rejects (`AlreadyStarted`, `UsernameTaken`).
    pub async fn join_room(
        &mut self,
        conn: ConnectionId,
        code: &RoomCode,
        username: String,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        match handle.join(conn, username, sender).await {
            Ok(()) => {
                self.connection_rooms.insert(conn, code.clone());
                Ok(())
            }
            Err(RoomError::Unavailable(_)) => {
                // The actor died under us — drop the stale handle and treat
                // the room as gone.
                self.rooms.remove(code);
                Err(RoomError::NotFound(code.clone()))
            }
            Err(e) => Err(e),
        }
    }

    /// Returns a handle to the room under `code`, if it is live.
    pub fn room(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    /// Returns the code of the room `conn` is currently in, if any.
    pub fn room_of(&self, conn: ConnectionId) -> Option<&RoomCode> {
        self.connection_rooms.get(&conn)
    }

    /// Removes `conn` from its room, evicting the room if it emptied.
    ///
    /// Idempotent: a connection in no room returns `None` and nothing
    /// changes.
    pub async fn disconnect(&mut self, conn: ConnectionId) -> Option<Departure> {
        let code = self.connection_rooms.remove(&conn)?;
        let handle = self.rooms.get(&code)?;

        match handle.disconnect(conn).await {
            Ok(Departure::Closed) => {
                self.rooms.remove(&code);
                tracing::info!(room = %code, "room destroyed");
                Some(Departure::Closed)
            }
            Ok(departure) => Some(departure),
            Err(_) => {
                // Actor already gone; make the eviction stick anyway.
                self.rooms.remove(&code);
                None
            }
        }
    }

    /// Returns info about the room under `code`.
    pub async fn room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.info().await
    }

    /// Returns `true` if a live room exists under `code`.
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
