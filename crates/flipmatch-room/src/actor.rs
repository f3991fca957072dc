//! Room actor: an isolated Tokio task that owns one [`Room`].
//!
//! Each room runs in its own task, reached only through an mpsc channel.
//! Commands are processed strictly in arrival order, which is what
//! linearizes all mutations on a room and fixes the event order every
//! subscriber observes. Rooms never block each other.

use std::collections::HashMap;

use flipmatch_protocol::{ConnectionId, Recipient, RoomCode, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{DisconnectOutcome, Phase, Room, RoomConfig, RoomError, room::Outbound};

/// Channel sender for delivering events to one subscribed connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// Operations whose rejection the client must hear about carry a reply
/// channel; flips, checks, and chat are fire-and-forget, exactly like the
/// silent no-op contract they implement.
pub(crate) enum RoomCommand {
    Join {
        conn: ConnectionId,
        username: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Start {
        conn: ConnectionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Flip {
        conn: ConnectionId,
        index: usize,
    },
    CheckMatch {
        conn: ConnectionId,
        indices: [usize; 2],
    },
    Chat {
        conn: ConnectionId,
        message: String,
    },
    Disconnect {
        conn: ConnectionId,
        reply: oneshot::Sender<Departure>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
}

/// What a disconnect did to the room, as seen by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The connection wasn't bound to this room.
    NotAMember,
    /// The player left; others remain.
    Left,
    /// The room emptied out and its actor is shutting down.
    Closed,
}

/// A snapshot of room metadata (not the board itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: Phase,
    pub player_count: usize,
}

/// Handle to a running room actor. Cheap to clone — an `mpsc::Sender`
/// wrapper. The registry holds one per live room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Asks the room to admit a player and waits for the verdict.
    pub async fn join(
        &self,
        conn: ConnectionId,
        username: String,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            conn,
            username,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Asks the creator's room to start the game.
    pub async fn start(&self, conn: ConnectionId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Start {
            conn,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Requests a flip (fire-and-forget).
    pub async fn flip(&self, conn: ConnectionId, index: usize) -> Result<(), RoomError> {
        self.send(RoomCommand::Flip { conn, index }).await
    }

    /// Requests a pair resolution (fire-and-forget).
    pub async fn check_match(
        &self,
        conn: ConnectionId,
        indices: [usize; 2],
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::CheckMatch { conn, indices }).await
    }

    /// Relays a chat line (fire-and-forget).
    pub async fn chat(&self, conn: ConnectionId, message: String) -> Result<(), RoomError> {
        self.send(RoomCommand::Chat { conn, message }).await
    }

    /// Removes a connection and reports what that did to the room.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<Departure, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Disconnect {
            conn,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    /// Per-connection outbound channels — the room-scoped pub/sub fan-out.
    senders: HashMap<ConnectionId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until the room empties.
    async fn run(mut self, creator: ConnectionId, creator_name: String) {
        tracing::info!(room = %self.room.code(), "room actor started");

        // The creator hears about their new room before anything else.
        self.dispatch(vec![(
            Recipient::Connection(creator),
            ServerEvent::RoomCreated {
                code: self.room.code().clone(),
                username: creator_name,
                is_creator: true,
            },
        )]);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    conn,
                    username,
                    sender,
                    reply,
                } => {
                    let result = match self.room.join(conn, username) {
                        Ok(events) => {
                            // Register first so the joiner hears their own join.
                            self.senders.insert(conn, sender);
                            self.dispatch(events);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    };
                    let _ = reply.send(result);
                }
                RoomCommand::Start { conn, reply } => {
                    let result = match self.room.start(conn) {
                        Ok(events) => {
                            self.dispatch(events);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    };
                    let _ = reply.send(result);
                }
                RoomCommand::Flip { conn, index } => {
                    let events = self.room.flip(conn, index);
                    self.dispatch(events);
                }
                RoomCommand::CheckMatch { conn, indices } => {
                    let events = self.room.check_match(conn, indices);
                    self.dispatch(events);
                }
                RoomCommand::Chat { conn, message } => {
                    let events = self.room.chat(conn, message);
                    self.dispatch(events);
                }
                RoomCommand::Disconnect { conn, reply } => {
                    self.senders.remove(&conn);
                    let departure = match self.room.disconnect(conn) {
                        DisconnectOutcome::NotAMember => Departure::NotAMember,
                        DisconnectOutcome::Left(events) => {
                            self.dispatch(events);
                            Departure::Left
                        }
                        DisconnectOutcome::Closed => Departure::Closed,
                    };
                    let _ = reply.send(departure);
                    if departure == Departure::Closed {
                        break;
                    }
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(RoomInfo {
                        code: self.room.code().clone(),
                        phase: self.room.phase(),
                        player_count: self.room.players().len(),
                    });
                }
            }
        }

        tracing::info!(room = %self.room.code(), "room actor stopped");
    }

    /// Delivers events to their recipients, in order. Sends to connections
    /// whose receiver is gone are silently dropped.
    fn dispatch(&self, events: Outbound) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Connection(conn) => {
                    if let Some(sender) = self.senders.get(&conn) {
                        let _ = sender.send(event);
                    }
                }
            }
        }
    }
}

/// Spawns a room actor seeded with its creator and returns a handle to it.
///
/// `channel_size` bounds the command queue — a stuffed room makes senders
/// wait instead of growing without limit.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: RoomConfig,
    creator: ConnectionId,
    username: String,
    sender: EventSender,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room: Room::new(code.clone(), creator, username.clone(), config),
        senders: HashMap::from([(creator, sender)]),
        receiver: rx,
    };

    tokio::spawn(actor.run(creator, username));

    RoomHandle { code, sender: tx }
}
