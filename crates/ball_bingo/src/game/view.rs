//! Read-only projections handed to hosts.

use serde::{Deserialize, Serialize};

use super::types::{CellState, GameStatus};
use crate::facts::Fact;
use crate::subject::{Subject, SubjectId};

/// One cell as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Position in the grid.
    pub index: usize,
    /// Fact shown on the cell.
    pub fact: Fact,
    /// Play state.
    pub state: CellState,
    /// Whether a move landed here.
    pub filled: bool,
    /// Solution subject; only present once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<SubjectId>,
}

/// The whole game as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game status.
    pub status: GameStatus,
    /// Subjects placed so far.
    pub deck_index: usize,
    /// Subjects in the deck.
    pub deck_len: usize,
    /// Subject currently up for matching; `None` once the game is over.
    pub current: Option<Subject>,
    /// Grid in presentation order.
    pub cells: Vec<CellView>,
}
