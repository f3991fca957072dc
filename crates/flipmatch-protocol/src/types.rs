//! Identity and routing types shared across the protocol.

use std::fmt;

use flipmatch_transport::ConnectionId;
use serde::{Deserialize, Serialize};

/// A room's short join code: 4 characters, uppercase A–Z and 0–9.
///
/// Codes are unique among *live* rooms only; once a room is destroyed its
/// code may be handed out again. Construction normalizes to uppercase so
/// that codes typed by players compare equal regardless of case.
///
/// `#[serde(transparent)]` keeps the wire shape a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a room code, upper-casing the input.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Specifies who should receive a server event.
///
/// Room operations return `(Recipient, ServerEvent)` pairs; this enum tells
/// the dispatch layer where each one goes. Error events go back to the
/// originating connection only; everything else is room-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection currently subscribed to the room.
    All,

    /// One specific connection.
    Connection(ConnectionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_normalizes_to_uppercase() {
        assert_eq!(RoomCode::new("ab12"), RoomCode::new("AB12"));
        assert_eq!(RoomCode::new("ab12").as_str(), "AB12");
    }

    #[test]
    fn test_room_code_display() {
        assert_eq!(RoomCode::new("XY9Z").to_string(), "XY9Z");
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("AB12")).unwrap();
        assert_eq!(json, "\"AB12\"");
    }

    #[test]
    fn test_room_code_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(RoomCode::new("AB12"), 1);
        assert_eq!(map[&RoomCode::new("ab12")], 1);
    }
}
