//! Puzzle definition and the move-refereeing state machine.

pub mod invariants;
mod outcome;
mod puzzle;
mod session;
mod types;
mod view;

pub use outcome::{MoveError, MoveResponse, MoveResult, Rejection};
pub use puzzle::{Puzzle, PuzzleError};
pub use session::GameSession;
pub use types::{Cell, CellState, GameStatus};
pub use view::{CellView, GameView};
