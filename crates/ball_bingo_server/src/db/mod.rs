//! SQLite persistence for players, clubs and titles.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{ClubRecord, PlayerRecord, PlayerRow, TitleRecord};
pub use repository::PlayerRepository;
