//! End-to-end tests: real WebSocket clients against a running server,
//! exercising the full create → join → start → flip → check → game-over
//! flow through the wire protocol.

use std::time::Duration;

use flipmatch::FlipmatchServer;
use flipmatch::protocol::{ClientAction, ServerEvent};
use flipmatch::room::RoomConfig;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

/// Boards of `n` pairs keep the game-over tests short.
fn pairs(n: usize) -> RoomConfig {
    RoomConfig {
        symbols: ('A'..).take(n).map(|c| c.to_string()).collect(),
        min_players: 2,
    }
}

async fn start_server(config: RoomConfig) -> String {
    let server = FlipmatchServer::builder()
        .bind("127.0.0.1:0")
        .room_config(config)
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn ws(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, action: &ClientAction) {
    let bytes = serde_json::to_vec(action).unwrap();
    ws.send(Message::Binary(bytes.into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("server sent undecodable event")
}

/// Asserts that no event arrives for a little while.
async fn assert_silent(ws: &mut Ws) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "expected silence, got {result:?}");
}

/// Creates a room and returns its code.
async fn create(ws: &mut Ws, username: &str) -> String {
    send(ws, &ClientAction::CreateGame { username: username.into() }).await;
    match recv(ws).await {
        ServerEvent::RoomCreated { code, is_creator, .. } => {
            assert!(is_creator);
            code.as_str().to_string()
        }
        other => panic!("expected RoomCreated, got {other:?}"),
    }
}

/// Ann creates, Bo joins, both drained past the join chatter.
async fn two_player_game(addr: &str) -> (Ws, Ws, String) {
    let mut ann = ws(addr).await;
    let mut bo = ws(addr).await;
    let code = create(&mut ann, "Ann").await;
    send(
        &mut bo,
        &ClientAction::JoinGame {
            username: "Bo".into(),
            code: code.clone(),
        },
    )
    .await;
    let _ = recv(&mut ann).await; // PlayerJoined
    let _ = recv(&mut bo).await;
    (ann, bo, code)
}

/// Starts the game and drains the StartGame event from both players.
async fn start_game(ann: &mut Ws, bo: &mut Ws, code: &str) {
    send(ann, &ClientAction::StartGame { code: code.into() }).await;
    for ws in [ann, bo] {
        match recv(ws).await {
            ServerEvent::StartGame { turn, .. } => assert_eq!(turn, "Ann"),
            other => panic!("expected StartGame, got {other:?}"),
        }
    }
}

/// Flips a card and returns the board from the update both players see.
async fn flip(ann: &mut Ws, bo: &mut Ws, index: usize, code: &str) -> Vec<String> {
    send(
        ann,
        &ClientAction::FlipCard {
            room_code: code.into(),
            index,
        },
    )
    .await;
    let cards = match recv(ann).await {
        ServerEvent::UpdateBoard { flipped, cards } => {
            assert_eq!(flipped, vec![index]);
            cards
        }
        other => panic!("expected UpdateBoard, got {other:?}"),
    };
    let _ = recv(bo).await;
    cards
}

// -------------------------------------------------------------------------
// Lobby flows
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_create_room_returns_code() {
    let addr = start_server(pairs(2)).await;
    let mut ann = ws(&addr).await;

    send(&mut ann, &ClientAction::CreateGame { username: "Ann".into() }).await;
    match recv(&mut ann).await {
        ServerEvent::RoomCreated {
            code,
            username,
            is_creator,
        } => {
            assert_eq!(code.as_str().len(), 4);
            assert_eq!(username, "Ann");
            assert!(is_creator);
        }
        other => panic!("expected RoomCreated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_broadcasts_roster_to_everyone() {
    let addr = start_server(pairs(2)).await;
    let mut ann = ws(&addr).await;
    let mut bo = ws(&addr).await;
    let code = create(&mut ann, "Ann").await;

    // Codes are case-insensitive on entry.
    send(
        &mut bo,
        &ClientAction::JoinGame {
            username: "Bo".into(),
            code: code.to_lowercase(),
        },
    )
    .await;

    for ws in [&mut ann, &mut bo] {
        match recv(ws).await {
            ServerEvent::PlayerJoined {
                username,
                players,
                is_creator,
            } => {
                assert_eq!(username, "Bo");
                assert_eq!(players, vec!["Ann", "Bo"]);
                assert!(!is_creator);
            }
            other => panic!("expected PlayerJoined, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_join_unknown_room_gets_error() {
    let addr = start_server(pairs(2)).await;
    let mut bo = ws(&addr).await;

    send(
        &mut bo,
        &ClientAction::JoinGame {
            username: "Bo".into(),
            code: "ZZZZ".into(),
        },
    )
    .await;
    match recv(&mut bo).await {
        ServerEvent::JoinError { message } => {
            assert!(message.contains("ZZZZ"), "message was: {message}");
        }
        other => panic!("expected JoinError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_username_gets_error() {
    let addr = start_server(pairs(2)).await;
    let mut ann = ws(&addr).await;
    let mut imposter = ws(&addr).await;
    let code = create(&mut ann, "Ann").await;

    send(
        &mut imposter,
        &ClientAction::JoinGame {
            username: "Ann".into(),
            code,
        },
    )
    .await;
    match recv(&mut imposter).await {
        ServerEvent::JoinError { message } => {
            assert!(message.contains("taken"), "message was: {message}");
        }
        other => panic!("expected JoinError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_start_alone_gets_error() {
    let addr = start_server(pairs(2)).await;
    let mut ann = ws(&addr).await;
    let code = create(&mut ann, "Ann").await;

    send(&mut ann, &ClientAction::StartGame { code }).await;
    match recv(&mut ann).await {
        ServerEvent::StartError { message } => {
            assert!(message.contains("2 players"), "message was: {message}");
        }
        other => panic!("expected StartError, got {other:?}"),
    }
}

// -------------------------------------------------------------------------
// Game flows
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_wrong_turn_flip_is_silent() {
    let addr = start_server(pairs(2)).await;
    let (mut ann, mut bo, code) = two_player_game(&addr).await;
    start_game(&mut ann, &mut bo, &code).await;

    // Bo doesn't hold the turn — nobody hears anything.
    send(
        &mut bo,
        &ClientAction::FlipCard {
            room_code: code.clone(),
            index: 0,
        },
    )
    .await;
    assert_silent(&mut ann).await;
    assert_silent(&mut bo).await;

    // Ann's flip goes through.
    let cards = flip(&mut ann, &mut bo, 0, &code).await;
    assert_eq!(cards.len(), 4);
}

#[tokio::test]
async fn test_single_pair_game_runs_to_game_over() {
    let addr = start_server(pairs(1)).await;
    let (mut ann, mut bo, code) = two_player_game(&addr).await;
    start_game(&mut ann, &mut bo, &code).await;

    flip(&mut ann, &mut bo, 0, &code).await;
    flip(&mut ann, &mut bo, 1, &code).await;

    send(
        &mut ann,
        &ClientAction::CheckMatch {
            room_code: code,
            indices: [0, 1],
        },
    )
    .await;

    for ws in [&mut ann, &mut bo] {
        match recv(ws).await {
            ServerEvent::MatchResult {
                is_match,
                scores,
                turn,
                ..
            } => {
                assert!(is_match);
                assert_eq!(scores["Ann"], 1);
                assert_eq!(turn, "Ann");
            }
            other => panic!("expected MatchResult, got {other:?}"),
        }
        match recv(ws).await {
            ServerEvent::GameOver { winner, scores } => {
                assert_eq!(winner, "Ann");
                assert_eq!(scores["Ann"], 1);
                assert_eq!(scores["Bo"], 0);
            }
            other => panic!("expected GameOver, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_mismatch_passes_turn_and_rehides_cards() {
    // Four cards in two pairs: Ann reveals a mismatch, the turn passes
    // to Bo, and both positions go face-down again.
    let addr = start_server(pairs(2)).await;
    let (mut ann, mut bo, code) = two_player_game(&addr).await;
    start_game(&mut ann, &mut bo, &code).await;

    let cards = flip(&mut ann, &mut bo, 0, &code).await;
    let miss = (1..cards.len())
        .find(|&i| cards[i] != cards[0])
        .expect("two pairs guarantee a mismatch");
    flip(&mut ann, &mut bo, miss, &code).await;

    send(
        &mut ann,
        &ClientAction::CheckMatch {
            room_code: code.clone(),
            indices: [0, miss],
        },
    )
    .await;

    for ws in [&mut ann, &mut bo] {
        match recv(ws).await {
            ServerEvent::MatchResult { is_match, turn, .. } => {
                assert!(!is_match);
                assert_eq!(turn, "Bo");
            }
            other => panic!("expected MatchResult, got {other:?}"),
        }
        assert_eq!(
            recv(ws).await,
            ServerEvent::TurnUpdate { turn: "Bo".into() }
        );
        assert_eq!(recv(ws).await, ServerEvent::TimerReset);
    }

    // Position 0 is face-down again: Bo may flip it.
    send(
        &mut bo,
        &ClientAction::FlipCard {
            room_code: code,
            index: 0,
        },
    )
    .await;
    match recv(&mut bo).await {
        ServerEvent::UpdateBoard { flipped, .. } => assert_eq!(flipped, vec![0]),
        other => panic!("expected UpdateBoard, got {other:?}"),
    }
}

// -------------------------------------------------------------------------
// Chat and departures
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_chat_is_relayed_to_the_room() {
    let addr = start_server(pairs(2)).await;
    let (mut ann, mut bo, code) = two_player_game(&addr).await;

    send(
        &mut bo,
        &ClientAction::ChatMessage {
            room_code: code,
            message: "good luck!".into(),
        },
    )
    .await;

    for ws in [&mut ann, &mut bo] {
        assert_eq!(
            recv(ws).await,
            ServerEvent::ChatMessage {
                username: "Bo".into(),
                message: "good luck!".into(),
            }
        );
    }
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_left() {
    let addr = start_server(pairs(2)).await;
    let (mut ann, mut bo, _code) = two_player_game(&addr).await;

    bo.close(None).await.unwrap();

    match recv(&mut ann).await {
        ServerEvent::PlayerLeft { username, players } => {
            assert_eq!(username, "Bo");
            assert_eq!(players, vec!["Ann"]);
        }
        other => panic!("expected PlayerLeft, got {other:?}"),
    }
}

#[tokio::test]
async fn test_room_dies_with_its_last_player() {
    // Dropping the only player destroys the room; the code no longer joins.
    let addr = start_server(pairs(2)).await;
    let mut ann = ws(&addr).await;
    let code = create(&mut ann, "Ann").await;
    ann.close(None).await.unwrap();

    // Give the server a moment to run the disconnect path.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut bo = ws(&addr).await;
    send(
        &mut bo,
        &ClientAction::JoinGame {
            username: "Bo".into(),
            code,
        },
    )
    .await;
    assert!(matches!(recv(&mut bo).await, ServerEvent::JoinError { .. }));
}
