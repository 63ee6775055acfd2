//! Tests for the HTTP routes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use ball_bingo::{FactConfig, GameStatus, GameView, GeneratorConfig, MoveResponse};
use ball_bingo_server::{
    AppState, ErrorBody, Health, PlayerRecord, PlayerRepository, SessionManager, router,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// A router over a temporary database holding `players` players, each with a
/// unique nationality. The session manager is shared with the router.
fn setup_app(players: usize) -> (NamedTempFile, Router, SessionManager) {
    setup_app_with(players, SessionManager::new())
}

fn setup_app_with(
    players: usize,
    sessions: SessionManager,
) -> (NamedTempFile, Router, SessionManager) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = PlayerRepository::new(db_path, FactConfig::default()).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    let records: Vec<PlayerRecord> = (1..=players)
        .map(|n| {
            PlayerRecord::new(
                format!("Star {n}"),
                Some(format!("Land {n}")),
                Some("Midfielder".to_string()),
            )
        })
        .collect();
    repo.import(&records).expect("Import failed");

    let state = AppState::new(sessions.clone(), repo, GeneratorConfig::default());
    (db_file, router(state), sessions)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("Invalid JSON body")
}

/// Grid index of the cell solved by the player's current subject.
fn winning_cell(sessions: &SessionManager, player: &str) -> usize {
    let session = sessions.get(player).expect("session");
    let current = session.current_subject().expect("game in progress");
    session
        .puzzle()
        .cells()
        .iter()
        .position(|c| *c.solution() == current)
        .expect("current subject has a cell")
}

fn move_body(cell: usize) -> String {
    format!(r#"{{"cell_index": {cell}}}"#)
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (_db, app, _sessions) = setup_app(0);
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let health: Health = parse(&body);
    assert_eq!(health.status, "ok");
    assert_eq!(health.sessions, 0);
}

#[tokio::test]
async fn test_state_without_game_is_not_found() {
    let (_db, app, _sessions) = setup_app(20);
    let (status, body) = send(&app, "GET", "/games/alice", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert!(!error.ok);
    assert_eq!(error.error, "no_game");
    assert_eq!(error.message, "No game. Press Start Game.");
}

#[tokio::test]
async fn test_start_game_returns_fresh_view() {
    let (_db, app, _sessions) = setup_app(20);
    let (status, body) = send(&app, "POST", "/games/alice", None).await;

    assert_eq!(status, StatusCode::OK);
    let view: GameView = parse(&body);
    assert_eq!(view.status, GameStatus::InProgress);
    assert_eq!(view.deck_index, 0);
    assert_eq!(view.deck_len, 16);
    assert_eq!(view.cells.len(), 16);
    assert!(view.current.is_some());
    assert!(view.cells.iter().all(|c| !c.filled && c.solution.is_none()));

    let (status, body) = send(&app, "GET", "/games/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let again: GameView = parse(&body);
    assert_eq!(again, view);
}

#[tokio::test]
async fn test_correct_move_advances_game() {
    let (_db, app, sessions) = setup_app(20);
    send(&app, "POST", "/games/alice", None).await;
    let cell = winning_cell(&sessions, "alice");

    let (status, body) = send(&app, "POST", "/games/alice/move", Some(&move_body(cell))).await;

    assert_eq!(status, StatusCode::OK);
    let response: MoveResponse = parse(&body);
    assert!(response.ok);
    assert_eq!(response.correct, Some(true));
    assert_eq!(response.won, Some(false));

    let (_, body) = send(&app, "GET", "/games/alice", None).await;
    let view: GameView = parse(&body);
    assert_eq!(view.deck_index, 1);
    assert!(view.cells[cell].filled);
}

#[tokio::test]
async fn test_wrong_move_loses_and_further_moves_are_refused() {
    let (_db, app, sessions) = setup_app(20);
    send(&app, "POST", "/games/bob", None).await;
    let right = winning_cell(&sessions, "bob");
    let wrong = (right + 1) % 16;

    let (status, body) = send(&app, "POST", "/games/bob/move", Some(&move_body(wrong))).await;
    assert_eq!(status, StatusCode::OK);
    let response: MoveResponse = parse(&body);
    assert!(response.ok);
    assert_eq!(response.correct, Some(false));
    assert_eq!(response.lost, Some(true));

    let (status, body) = send(&app, "POST", "/games/bob/move", Some(&move_body(right))).await;
    assert_eq!(status, StatusCode::OK);
    let response: MoveResponse = parse(&body);
    assert!(!response.ok);
    assert_eq!(response.reason.as_deref(), Some("finished"));

    let (_, body) = send(&app, "GET", "/games/bob", None).await;
    let view: GameView = parse(&body);
    assert_eq!(view.status, GameStatus::Lost);
    assert!(view.current.is_none());
    assert!(view.cells.iter().all(|c| c.solution.is_some()));
}

#[tokio::test]
async fn test_out_of_range_cell_is_unprocessable() {
    let (_db, app, sessions) = setup_app(20);
    send(&app, "POST", "/games/carol", None).await;
    let before = sessions.get("carol").expect("session");

    let (status, body) = send(&app, "POST", "/games/carol/move", Some(&move_body(16))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "invalid_input");
    assert_eq!(sessions.get("carol"), Some(before));
}

#[tokio::test]
async fn test_malformed_move_body_is_unprocessable() {
    let (_db, app, _sessions) = setup_app(20);
    send(&app, "POST", "/games/dave", None).await;

    for body in [r#"{"cell_index": -1}"#, r#"{"cell_index": "three"}"#, "{}"] {
        let (status, bytes) = send(&app, "POST", "/games/dave/move", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        let error: ErrorBody = parse(&bytes);
        assert_eq!(error.error, "invalid_input");
    }
}

#[tokio::test]
async fn test_move_without_game_is_not_found() {
    let (_db, app, _sessions) = setup_app(20);
    let (status, body) = send(&app, "POST", "/games/erin/move", Some(&move_body(0))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "no_game");
}

#[tokio::test]
async fn test_start_with_too_few_players_is_unavailable() {
    let (_db, app, sessions) = setup_app(5);
    let (status, body) = send(&app, "POST", "/games/frank", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "insufficient_data");
    assert!(error.message.contains("Not enough players"));
    assert!(sessions.get("frank").is_none());
}

#[tokio::test]
async fn test_restart_replaces_game() {
    let (_db, app, sessions) = setup_app(20);
    send(&app, "POST", "/games/gina", None).await;
    let cell = winning_cell(&sessions, "gina");
    send(&app, "POST", "/games/gina/move", Some(&move_body(cell))).await;

    let (status, body) = send(&app, "POST", "/games/gina", None).await;

    assert_eq!(status, StatusCode::OK);
    let view: GameView = parse(&body);
    assert_eq!(view.deck_index, 0);
    assert_eq!(sessions.session_count(), 1);
}

#[tokio::test]
async fn test_end_game_drops_session() {
    let (_db, app, sessions) = setup_app(20);
    send(&app, "POST", "/games/hana", None).await;

    let (status, body) = send(&app, "DELETE", "/games/hana", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(sessions.session_count(), 0);

    let (status, body) = send(&app, "GET", "/games/hana", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "no_game");
}

#[tokio::test]
async fn test_end_missing_game_is_not_found() {
    let (_db, app, _sessions) = setup_app(20);
    let (status, body) = send(&app, "DELETE", "/games/ivan", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "no_game");
}

#[tokio::test]
async fn test_session_limit_evicts_finished_game_first() {
    let (_db, app, sessions) = setup_app_with(20, SessionManager::with_max_sessions(2));
    send(&app, "POST", "/games/jon", None).await;
    send(&app, "POST", "/games/kim", None).await;
    let right = winning_cell(&sessions, "kim");
    send(&app, "POST", "/games/kim/move", Some(&move_body((right + 1) % 16))).await;

    let (status, _) = send(&app, "POST", "/games/lea", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/health", None).await;
    let health: Health = parse(&body);
    assert_eq!(health.sessions, 2);
    let (status, _) = send(&app, "GET", "/games/kim", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/games/jon", None).await;
    assert_eq!(status, StatusCode::OK);
}
