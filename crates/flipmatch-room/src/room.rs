//! The room state machine: membership, board, scores, and turn rotation.
//!
//! `Room` is pure and synchronous — every operation mutates in-memory state
//! and returns the events to deliver, as `(Recipient, ServerEvent)` pairs.
//! Delivery, ordering, and concurrency live in the actor wrapper; the rules
//! live here, where they can be tested without a runtime.
//!
//! Rejections a client should hear about come back as `Err(RoomError)`.
//! Anything a well-behaved client never sends (wrong-turn flips, re-flips,
//! a third flip, a stale start) is dropped silently: no event, no mutation.

use std::collections::HashMap;

use flipmatch_protocol::{ConnectionId, Recipient, RoomCode, ServerEvent};

use crate::{Phase, RoomConfig, RoomError, board};

/// Events produced by one room operation, in delivery order.
pub type Outbound = Vec<(Recipient, ServerEvent)>;

/// What happened when a connection left the room.
#[derive(Debug)]
pub enum DisconnectOutcome {
    /// The connection was never bound here; nothing changed.
    NotAMember,

    /// The player left; the remaining roster should hear about it.
    Left(Outbound),

    /// The last player left. The caller must evict the room.
    Closed,
}

/// One game session.
///
/// The players list is in join order, which is also turn-rotation order;
/// the first entry is the creator. Connections are bound to usernames
/// explicitly — the room owns the association in both directions.
pub struct Room {
    code: RoomCode,
    config: RoomConfig,
    phase: Phase,
    players: Vec<String>,
    bindings: HashMap<ConnectionId, String>,
    creator: ConnectionId,
    board: Vec<String>,
    revealed: Vec<bool>,
    /// Positions revealed this turn but not yet resolved. Never more than
    /// two: the third flip is refused until `check_match` clears the pair.
    pending: Vec<usize>,
    scores: HashMap<String, u32>,
    turn_index: usize,
}

impl Room {
    /// Creates an unstarted room with its creator as the only player.
    pub fn new(
        code: RoomCode,
        creator: ConnectionId,
        username: impl Into<String>,
        config: RoomConfig,
    ) -> Self {
        let username = username.into();
        Self {
            code,
            config,
            phase: Phase::Lobby,
            players: vec![username.clone()],
            bindings: HashMap::from([(creator, username)]),
            creator,
            board: Vec::new(),
            revealed: Vec::new(),
            pending: Vec::new(),
            scores: HashMap::new(),
            turn_index: 0,
        }
    }

    /// Adds a player, binding their connection to the chosen name.
    ///
    /// # Errors
    /// [`RoomError::AlreadyStarted`] once the membership is frozen,
    /// [`RoomError::UsernameTaken`] if the name is in use.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        username: impl Into<String>,
    ) -> Result<Outbound, RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::AlreadyStarted);
        }
        let username = username.into();
        if self.players.iter().any(|p| p == &username) {
            return Err(RoomError::UsernameTaken);
        }

        self.players.push(username.clone());
        self.bindings.insert(conn, username.clone());
        tracing::info!(
            room = %self.code,
            %conn,
            username,
            players = self.players.len(),
            "player joined"
        );

        Ok(vec![(
            Recipient::All,
            ServerEvent::PlayerJoined {
                username,
                players: self.players.clone(),
                is_creator: conn == self.creator,
            },
        )])
    }

    /// Deals the board and opens the turn rotation.
    ///
    /// Only the creator's connection can start, and only from the lobby —
    /// anything else is stale client traffic, dropped without an event.
    ///
    /// # Errors
    /// [`RoomError::NotEnoughPlayers`] below the configured minimum.
    pub fn start(&mut self, conn: ConnectionId) -> Result<Outbound, RoomError> {
        if conn != self.creator || !self.phase.is_joinable() {
            return Ok(Vec::new());
        }
        if self.players.len() < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers);
        }

        self.board = board::build(&self.config.symbols, self.config.symbols.len());
        self.revealed = vec![false; self.board.len()];
        self.pending.clear();
        self.scores = self.players.iter().map(|p| (p.clone(), 0)).collect();
        self.turn_index = 0;
        self.phase = Phase::Playing;
        tracing::info!(
            room = %self.code,
            players = self.players.len(),
            cards = self.board.len(),
            "game started"
        );

        Ok(vec![(
            Recipient::All,
            ServerEvent::StartGame {
                // Card faces stay hidden until individually revealed.
                cards: vec![String::new(); self.board.len()],
                flipped: self.revealed.clone(),
                scores: self.scores.clone(),
                turn: self.players[self.turn_index].clone(),
                players: self.players.clone(),
            },
        )])
    }

    /// Reveals a face-down position for the current player.
    ///
    /// Silent no-op unless the game is live, the connection holds the turn,
    /// the index is a hidden position, and fewer than two flips are pending.
    pub fn flip(&mut self, conn: ConnectionId, index: usize) -> Outbound {
        if !self.phase.is_playing() || !self.holds_turn(conn) {
            return Vec::new();
        }
        if index >= self.board.len() || self.revealed[index] || self.pending.len() >= 2 {
            return Vec::new();
        }

        self.revealed[index] = true;
        self.pending.push(index);

        vec![(
            Recipient::All,
            ServerEvent::UpdateBoard {
                flipped: vec![index],
                cards: self.board.clone(),
            },
        )]
    }

    /// Resolves the pending pair: score and keep the turn on a match, hide
    /// both and rotate on a miss, end the game once every pair is matched.
    ///
    /// Silent no-op unless the connection holds the turn and `indices` names
    /// exactly the two pending positions.
    pub fn check_match(&mut self, conn: ConnectionId, indices: [usize; 2]) -> Outbound {
        if !self.phase.is_playing() || !self.holds_turn(conn) {
            return Vec::new();
        }
        let [i1, i2] = indices;
        if self.pending.len() != 2
            || i1 == i2
            || !self.pending.contains(&i1)
            || !self.pending.contains(&i2)
        {
            return Vec::new();
        }
        self.pending.clear();

        let player = self.players[self.turn_index].clone();
        let mut out = Vec::new();

        if self.board[i1] == self.board[i2] {
            *self.scores.entry(player.clone()).or_insert(0) += 1;
            out.push((
                Recipient::All,
                ServerEvent::MatchResult {
                    is_match: true,
                    indices,
                    scores: self.scores.clone(),
                    turn: player.clone(),
                },
            ));

            if self.revealed.iter().all(|r| *r) {
                self.phase = Phase::Over;
                let winner = self.winner();
                tracing::info!(room = %self.code, winner, "game over");
                out.push((
                    Recipient::All,
                    ServerEvent::GameOver {
                        winner,
                        scores: self.scores.clone(),
                    },
                ));
                return out;
            }

            // A match grants another turn.
            out.push((Recipient::All, ServerEvent::TurnUpdate { turn: player }));
        } else {
            self.revealed[i1] = false;
            self.revealed[i2] = false;
            self.turn_index = (self.turn_index + 1) % self.players.len();
            let next = self.players[self.turn_index].clone();
            out.push((
                Recipient::All,
                ServerEvent::MatchResult {
                    is_match: false,
                    indices,
                    scores: self.scores.clone(),
                    turn: next.clone(),
                },
            ));
            out.push((Recipient::All, ServerEvent::TurnUpdate { turn: next }));
        }

        out.push((Recipient::All, ServerEvent::TimerReset));
        out
    }

    /// Relays a chat line to the room. Unbound connections show as "Guest".
    /// Works in every phase — the room stays addressable once the game ends.
    pub fn chat(&self, conn: ConnectionId, message: String) -> Outbound {
        let username = self
            .bindings
            .get(&conn)
            .cloned()
            .unwrap_or_else(|| "Guest".to_string());
        vec![(
            Recipient::All,
            ServerEvent::ChatMessage { username, message },
        )]
    }

    /// Unbinds a connection and removes its player from the roster.
    ///
    /// Idempotent: a connection that was never bound (or already removed)
    /// comes back as [`DisconnectOutcome::NotAMember`]. When the departing
    /// player held the turn, their unresolved flips are hidden again and the
    /// turn falls to the next remaining player in rotation order.
    pub fn disconnect(&mut self, conn: ConnectionId) -> DisconnectOutcome {
        let Some(username) = self.bindings.remove(&conn) else {
            return DisconnectOutcome::NotAMember;
        };
        let pos = self
            .players
            .iter()
            .position(|p| p == &username)
            .expect("bound username is on the roster");

        let had_turn = self.phase.is_playing() && pos == self.turn_index;
        self.players.remove(pos);
        tracing::info!(
            room = %self.code,
            %conn,
            username,
            players = self.players.len(),
            "player left"
        );

        if self.players.is_empty() {
            return DisconnectOutcome::Closed;
        }

        if self.phase.is_playing() {
            if had_turn {
                // Unresolved flips leave with their owner.
                for &i in &self.pending {
                    self.revealed[i] = false;
                }
                self.pending.clear();
            }
            if pos < self.turn_index {
                self.turn_index -= 1;
            }
            if self.turn_index >= self.players.len() {
                self.turn_index = 0;
            }
        }

        DisconnectOutcome::Left(vec![(
            Recipient::All,
            ServerEvent::PlayerLeft {
                username,
                players: self.players.clone(),
            },
        )])
    }

    /// Whether this connection's player currently holds the turn.
    fn holds_turn(&self, conn: ConnectionId) -> bool {
        match (self.bindings.get(&conn), self.players.get(self.turn_index)) {
            (Some(bound), Some(current)) => bound == current,
            _ => false,
        }
    }

    /// First player in turn order holding the maximum score.
    fn winner(&self) -> String {
        let mut best: Option<(&str, u32)> = None;
        for player in &self.players {
            let score = self.scores.get(player).copied().unwrap_or(0);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((player, score));
            }
        }
        best.map(|(player, _)| player.to_string()).unwrap_or_default()
    }

    // -- Accessors --------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn scores(&self) -> &HashMap<String, u32> {
        &self.scores
    }

    /// The authoritative board. Empty until the game starts.
    pub fn board(&self) -> &[String] {
        &self.board
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn current_player(&self) -> Option<&str> {
        self.players.get(self.turn_index).map(|s| s.as_str())
    }
}

// =========================================================================
// Tests
// =========================================================================
