//! Core domain types for a bingo grid.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::facts::Fact;
use crate::subject::SubjectId;

/// Play state of a cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CellState {
    /// Not played yet.
    #[default]
    Empty,
    /// The revealed subject was placed here and matched.
    Correct,
    /// The revealed subject was placed here and did not match.
    Wrong,
}

/// One grid cell: a fact, the subject it identifies, and its play state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Cell {
    /// Fact shown to the player.
    fact: Fact,
    /// Subject the fact identifies.
    solution: SubjectId,
    /// Play state.
    #[serde(default)]
    state: CellState,
}

impl Cell {
    /// Creates an unplayed cell.
    pub fn new(fact: Fact, solution: SubjectId) -> Self {
        Self {
            fact,
            solution,
            state: CellState::Empty,
        }
    }

    /// True once any move has landed on this cell.
    pub fn is_filled(&self) -> bool {
        self.state != CellState::Empty
    }

    pub(crate) fn mark(&mut self, state: CellState) {
        self.state = state;
    }
}

/// Current status of the game.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Moves are accepted.
    #[default]
    InProgress,
    /// Every deck subject was placed correctly.
    Won,
    /// A subject was placed on the wrong cell.
    Lost,
}

impl GameStatus {
    /// True for `Won` and `Lost`; no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}
