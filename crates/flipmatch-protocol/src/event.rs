//! Inbound actions and outbound events.
//!
//! The tag values (`create_game`, `match_result`, …) are the wire contract:
//! clients dispatch on them, so renaming a variant is a breaking change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::RoomCode;

/// An action a client asks the server to perform.
///
/// `#[serde(tag = "action")]` produces internally tagged JSON:
/// `{ "action": "flip_card", "room_code": "AB12", "index": 3 }`.
/// Room codes arrive as raw strings and are normalized by the gateway;
/// indices are validated by the room, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    /// Open a new room and become its creator.
    CreateGame { username: String },

    /// Join an existing, not-yet-started room.
    JoinGame { username: String, code: String },

    /// Start the game (creator only, ≥2 players).
    StartGame { code: String },

    /// Reveal one face-down position.
    FlipCard { room_code: String, index: usize },

    /// Resolve the two positions flipped this turn.
    CheckMatch {
        room_code: String,
        indices: [usize; 2],
    },

    /// Say something to the room.
    ChatMessage { room_code: String, message: String },
}

/// An event the server delivers to room subscribers.
///
/// Scores travel as a username → match-count map. `start_game` carries
/// placeholder card faces (`""` per position) — token identities stay
/// server-side until a position is revealed. `update_board` carries the
/// full board: a deliberate wire-compatibility choice, clients are trusted
/// to keep face-down tokens hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// To the creator only: the room is open under `code`.
    RoomCreated {
        code: RoomCode,
        username: String,
        is_creator: bool,
    },

    /// To the failed joiner only.
    JoinError { message: String },

    /// Roster update after a successful join. `is_creator` is relative to
    /// the joining connection.
    PlayerJoined {
        username: String,
        players: Vec<String>,
        is_creator: bool,
    },

    /// To the creator only, when starting with too few players.
    StartError { message: String },

    /// The game began: board size, zeroed scores, and the opening turn.
    StartGame {
        cards: Vec<String>,
        flipped: Vec<bool>,
        scores: HashMap<String, u32>,
        turn: String,
        players: Vec<String>,
    },

    /// A position was revealed.
    UpdateBoard {
        flipped: Vec<usize>,
        cards: Vec<String>,
    },

    /// The pending pair was resolved. `turn` names the player who moves
    /// next — the same player on a match, the next in rotation otherwise.
    MatchResult {
        #[serde(rename = "match")]
        is_match: bool,
        indices: [usize; 2],
        scores: HashMap<String, u32>,
        turn: String,
    },

    /// Whose move it is now.
    TurnUpdate { turn: String },

    /// Ask the presentation layer to restart its per-turn countdown.
    TimerReset,

    /// Every pair is matched; the session is over.
    GameOver {
        winner: String,
        scores: HashMap<String, u32>,
    },

    /// A chat line, relayed verbatim.
    ChatMessage { username: String, message: String },

    /// Roster update after a departure.
    PlayerLeft {
        username: String,
        players: Vec<String>,
    },
}
