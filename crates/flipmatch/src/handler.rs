//! Per-connection handler: inbound action routing and outbound fan-out.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Open the connection's event channel and spawn a writer task that
//!      forwards room events onto the socket.
//!   2. Loop: receive frames → decode `ClientAction` → route to the
//!      registry or the room named by the action's code.
//!   3. On close (clean or not), unbind the connection from its room.
//!
//! Undecodable frames and actions against unknown rooms are dropped with a
//! debug log — a misbehaving client gets no feedback beyond the named
//! error events the protocol defines.

use std::sync::Arc;

use flipmatch_protocol::{ClientAction, Codec, ConnectionId, RoomCode, ServerEvent};
use flipmatch_room::{Departure, EventSender, RoomError, RoomHandle};
use flipmatch_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::FlipmatchError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), FlipmatchError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let conn = Arc::new(conn);
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: drains the event channel onto the socket. Per-room event
    // order is preserved because each room's actor pushes into this channel
    // sequentially and the drain is FIFO.
    let writer_conn = Arc::clone(&conn);
    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                let action: ClientAction = match state.codec.decode(&data) {
                    Ok(action) => action,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "undecodable action");
                        continue;
                    }
                };
                dispatch_action(&state, conn_id, &tx, action).await;
            }
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // The socket is gone — remove the player from their room (idempotent)
    // and stop the writer.
    let departure = state.registry.lock().await.disconnect(conn_id).await;
    if matches!(departure, Some(Departure::Closed)) {
        tracing::info!(%conn_id, "last player left, room destroyed");
    }
    writer.abort();

    Ok(())
}

/// Routes one decoded action to the registry or its room.
async fn dispatch_action(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    tx: &EventSender,
    action: ClientAction,
) {
    match action {
        ClientAction::CreateGame { username } => {
            let mut registry = state.registry.lock().await;
            if registry.room_of(conn_id).is_some() {
                tracing::debug!(%conn_id, "create from a connection already in a room");
                return;
            }
            registry.create_room(conn_id, username, state.room_config.clone(), tx.clone());
        }

        ClientAction::JoinGame { username, code } => {
            let code = RoomCode::new(code);
            let mut registry = state.registry.lock().await;
            if registry.room_of(conn_id).is_some() {
                tracing::debug!(%conn_id, "join from a connection already in a room");
                return;
            }
            if let Err(e) = registry.join_room(conn_id, &code, username, tx.clone()).await {
                tracing::debug!(%conn_id, room = %code, error = %e, "join rejected");
                let _ = tx.send(ServerEvent::JoinError {
                    message: e.to_string(),
                });
            }
        }

        ClientAction::StartGame { code } => {
            let Some(handle) = room(state, &code).await else {
                return;
            };
            match handle.start(conn_id).await {
                Ok(()) => {}
                Err(e @ RoomError::NotEnoughPlayers) => {
                    let _ = tx.send(ServerEvent::StartError {
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "start failed");
                }
            }
        }

        ClientAction::FlipCard { room_code, index } => {
            if let Some(handle) = room(state, &room_code).await {
                let _ = handle.flip(conn_id, index).await;
            }
        }

        ClientAction::CheckMatch { room_code, indices } => {
            if let Some(handle) = room(state, &room_code).await {
                let _ = handle.check_match(conn_id, indices).await;
            }
        }

        ClientAction::ChatMessage { room_code, message } => {
            if let Some(handle) = room(state, &room_code).await {
                let _ = handle.chat(conn_id, message).await;
            }
        }
    }
}

/// Resolves a raw code to a live room handle, holding the registry lock
/// only for the lookup.
async fn room(state: &Arc<ServerState>, code: &str) -> Option<RoomHandle> {
    state.registry.lock().await.room(&RoomCode::new(code))
}
