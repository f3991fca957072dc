//! Room configuration and lifecycle phases.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// The symbol set of the stock board: eight fruit, eight pairs, sixteen cards.
pub const DEFAULT_SYMBOLS: [&str; 8] = ["🍎", "🍌", "🍇", "🍓", "🍒", "🍍", "🥝", "🍉"];

/// Configuration for a room instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Symbols to deal; every one of them becomes a pair on the board.
    pub symbols: Vec<String>,

    /// Minimum players required before the creator may start.
    pub min_players: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            min_players: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// ```text
/// Lobby → Playing → Over
/// ```
///
/// - **Lobby**: accepting joins, board not dealt.
/// - **Playing**: membership frozen, turn rotation active.
/// - **Over**: every pair matched. Terminal — the room stays addressable
///   for chat until the last player leaves, but flips and checks are
///   rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Playing,
    Over,
}

impl Phase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if the turn rotation is live.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` if the game has finished.
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Over)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Playing => write!(f, "Playing"),
            Self::Over => write!(f, "Over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_joinable_only_in_lobby() {
        assert!(Phase::Lobby.is_joinable());
        assert!(!Phase::Playing.is_joinable());
        assert!(!Phase::Over.is_joinable());
    }

    #[test]
    fn test_phase_is_playing() {
        assert!(!Phase::Lobby.is_playing());
        assert!(Phase::Playing.is_playing());
        assert!(!Phase::Over.is_playing());
    }

    #[test]
    fn test_phase_is_over() {
        assert!(!Phase::Lobby.is_over());
        assert!(!Phase::Playing.is_over());
        assert!(Phase::Over.is_over());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Lobby.to_string(), "Lobby");
        assert_eq!(Phase::Over.to_string(), "Over");
    }

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.symbols.len(), 8);
        assert_eq!(config.min_players, 2);
    }
}
