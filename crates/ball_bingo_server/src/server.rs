//! HTTP surface: start a game, read its state, play a move, end it.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ball_bingo::{
    GameSession, GameView, GenerateError, GeneratorConfig, MoveResponse, PuzzleGenerator,
    SourceError,
};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

use crate::db::PlayerRepository;
use crate::session::{SessionError, SessionManager};

/// Shared state handed to every handler.
#[derive(Debug, Clone, Getters, new)]
pub struct AppState {
    sessions: SessionManager,
    repository: PlayerRepository,
    generator: GeneratorConfig,
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Grid cell to place the current subject on.
    pub cell_index: usize,
}

/// Health check body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: String,
    /// Players holding a session.
    pub sessions: usize,
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub ok: bool,
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Request failure, mapped onto an HTTP status.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// The player has no game.
    #[display("No game. Press Start Game.")]
    #[from(ignore)]
    NoGame,

    /// Malformed request body or cell index.
    #[display("Invalid input: {}", _0)]
    #[from(ignore)]
    InvalidInput(#[error(not(source))] String),

    /// Puzzle generation failed.
    #[display("{}", _0)]
    Generate(GenerateError),

    /// The player store failed.
    #[display("{}", _0)]
    Source(SourceError),

    /// A background task failed.
    #[display("Internal error: {}", _0)]
    #[from(ignore)]
    Internal(#[error(not(source))] String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoGame => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Generate(GenerateError::InsufficientData { .. })
            | Self::Generate(GenerateError::GenerationFailed { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Generate(_) | Self::Source(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NoGame => "no_game",
            Self::InvalidInput(_) => "invalid_input",
            Self::Generate(GenerateError::InsufficientData { .. }) => "insufficient_data",
            Self::Generate(GenerateError::GenerationFailed { .. }) => "generation_failed",
            Self::Generate(GenerateError::InvalidConfig { .. }) => "invalid_config",
            Self::Generate(GenerateError::Source(_)) | Self::Source(_) => "source",
            Self::Generate(GenerateError::Puzzle(_))
            | Self::Generate(GenerateError::NoUniqueFact { .. })
            | Self::Internal(_) => "internal",
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoGame(_) => Self::NoGame,
            SessionError::InvalidMove(e) => Self::InvalidInput(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request refused");
        }
        let body = ErrorBody {
            ok: false,
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/games/{player}",
            post(start_game).get(game_state).delete(end_game),
        )
        .route("/games/{player}/move", post(make_move))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

#[instrument(skip(state))]
async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        sessions: state.sessions.session_count(),
    })
}

/// Generates a fresh puzzle and replaces the player's session.
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let repository = state.repository.clone();
    let config = state.generator.clone();

    let (session, view) = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let puzzle = PuzzleGenerator::new(&repository, config).generate()?;
        let session = GameSession::new(puzzle);
        let view = session.snapshot(&repository)?;
        Ok((session, view))
    })
    .await??;

    state.sessions.install(player, session);
    info!(deck_len = view.deck_len, "Game started");
    Ok(Json(view))
}

/// Current view of the player's game.
#[instrument(skip(state))]
async fn game_state(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let session = state.sessions.get(&player).ok_or(ApiError::NoGame)?;
    let repository = state.repository.clone();

    let view = tokio::task::spawn_blocking(move || session.snapshot(&repository)).await??;
    Ok(Json(view))
}

/// Drops the player's game.
#[instrument(skip(state))]
async fn end_game(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&player) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NoGame)
    }
}

/// Places the current subject on a cell.
#[instrument(skip(state, payload))]
async fn make_move(
    State(state): State<AppState>,
    Path(player): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let result = state.sessions.submit_move(&player, request.cell_index)?;
    Ok(Json(MoveResponse::from(result)))
}
