//! Ball Bingo host: SQLite player store, per-player sessions, and the HTTP
//! routes a frontend calls to start a game, read it, and play moves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod server;
mod session;

pub use config::{ConfigError, ServerConfig};
pub use db::{ClubRecord, DbError, PlayerRecord, PlayerRepository, PlayerRow, TitleRecord};
pub use server::{ApiError, AppState, ErrorBody, Health, MoveRequest, router};
pub use session::{DEFAULT_MAX_SESSIONS, PlayerId, SessionError, SessionManager};
