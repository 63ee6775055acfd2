//! The move-refereeing state machine.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::invariants::{InvariantSet, InvariantViolation, SessionInvariants};
use super::outcome::{MoveError, MoveResult, Rejection};
use super::puzzle::{Puzzle, PuzzleError};
use super::types::{CellState, GameStatus};
use super::view::{CellView, GameView};
use crate::source::{SourceError, SubjectSource};
use crate::subject::{Subject, SubjectId};

/// One game: a puzzle plus how far through the deck the player is.
///
/// A session is a plain value. Hosts own it, persist it however they like,
/// and must not submit moves on the same session concurrently. Once the
/// status is terminal nothing about the session changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionParts")]
pub struct GameSession {
    puzzle: Puzzle,
    deck_index: usize,
    status: GameStatus,
}

#[derive(Deserialize)]
struct SessionParts {
    puzzle: Puzzle,
    deck_index: usize,
    status: GameStatus,
}

impl TryFrom<SessionParts> for GameSession {
    type Error = PuzzleError;

    fn try_from(parts: SessionParts) -> Result<Self, Self::Error> {
        Self::restore(parts.puzzle, parts.deck_index, parts.status)
    }
}

impl GameSession {
    /// Starts a game at the top of the deck.
    #[instrument(skip(puzzle), fields(cells = puzzle.len()))]
    pub fn new(puzzle: Puzzle) -> Self {
        info!("Starting new game session");
        Self {
            puzzle,
            deck_index: 0,
            status: GameStatus::InProgress,
        }
    }

    /// Rebuilds a persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::InconsistentSession`] if the parts do not
    /// describe a reachable game state.
    #[instrument(skip(puzzle), fields(cells = puzzle.len()))]
    pub fn restore(
        puzzle: Puzzle,
        deck_index: usize,
        status: GameStatus,
    ) -> Result<Self, PuzzleError> {
        let session = Self {
            puzzle,
            deck_index,
            status,
        };
        session.check_invariants().map_err(|violations| {
            let violations = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%violations, "Rejected inconsistent session");
            PuzzleError::InconsistentSession { violations }
        })?;
        Ok(session)
    }

    #[cfg(test)]
    pub(crate) fn from_parts_unchecked(
        puzzle: Puzzle,
        deck_index: usize,
        status: GameStatus,
    ) -> Self {
        Self {
            puzzle,
            deck_index,
            status,
        }
    }

    #[cfg(test)]
    pub(crate) fn puzzle_mut(&mut self) -> &mut Puzzle {
        &mut self.puzzle
    }

    /// The puzzle with current cell states.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Index of the next deck subject to place.
    pub fn deck_index(&self) -> usize {
        self.deck_index
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The subject currently up for matching, or `None` once the game is over.
    pub fn current_subject(&self) -> Option<SubjectId> {
        if self.status.is_terminal() {
            return None;
        }
        self.puzzle.deck().get(self.deck_index).copied()
    }

    /// Places the current subject on the cell at `cell_index`.
    ///
    /// A mismatch loses the game. A match advances the deck and wins the
    /// game once the deck is exhausted. Only the targeted cell and this
    /// session's own progress are ever modified.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidCell`] if `cell_index` is outside the grid.
    /// Refusals (finished game, filled cell) are `Ok(MoveResult::Rejected)`.
    #[instrument(skip(self), fields(deck_index = self.deck_index, status = %self.status))]
    pub fn submit_move(&mut self, cell_index: usize) -> Result<MoveResult, MoveError> {
        let cells = self.puzzle.len();
        if cell_index >= cells {
            warn!(cell_index, cells, "Cell index out of range");
            return Err(MoveError::InvalidCell {
                index: cell_index,
                cells,
            });
        }

        let Some(current) = self.current_subject() else {
            debug!("Move on finished game");
            return Ok(MoveResult::Rejected(Rejection::Finished));
        };

        let deck_len = self.puzzle.deck().len();
        let Some(cell) = self.puzzle.cell_mut(cell_index) else {
            return Err(MoveError::InvalidCell {
                index: cell_index,
                cells,
            });
        };

        if cell.is_filled() {
            debug!(cell_index, "Cell already filled");
            return Ok(MoveResult::Rejected(Rejection::AlreadyFilled));
        }

        let result = if *cell.solution() != current {
            cell.mark(CellState::Wrong);
            self.status = GameStatus::Lost;
            info!(cell_index, subject = %current, "Wrong cell, game lost");
            MoveResult::Wrong
        } else {
            cell.mark(CellState::Correct);
            self.deck_index += 1;
            let won = self.deck_index == deck_len;
            if won {
                self.status = GameStatus::Won;
                info!(cell_index, subject = %current, "Deck complete, game won");
            } else {
                info!(cell_index, subject = %current, deck_index = self.deck_index, "Correct cell");
            }
            MoveResult::Correct { won }
        };

        if let Err(violations) = self.check_invariants() {
            for violation in &violations {
                error!(violation = %violation.description, "Session invariant violated after move");
            }
        }
        Ok(result)
    }

    /// Checks every session invariant.
    ///
    /// # Errors
    ///
    /// Returns the violated invariants.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        SessionInvariants::check_all(self)
    }

    /// Read-only projection of the game. `current` should be the subject
    /// behind [`GameSession::current_subject`]; it is dropped once the game
    /// is over. Solutions are only exposed on finished games.
    pub fn view(&self, current: Option<Subject>) -> GameView {
        let finished = self.status.is_terminal();
        let cells = self
            .puzzle
            .cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| CellView {
                index,
                fact: cell.fact().clone(),
                state: *cell.state(),
                filled: cell.is_filled(),
                solution: finished.then_some(*cell.solution()),
            })
            .collect();

        GameView {
            status: self.status,
            deck_index: self.deck_index,
            deck_len: self.puzzle.deck().len(),
            current: if finished { None } else { current },
            cells,
        }
    }

    /// Builds the projection, resolving the current subject through `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the lookup fails.
    #[instrument(skip(self, source), fields(status = %self.status, deck_index = self.deck_index))]
    pub fn snapshot<S>(&self, source: &S) -> Result<GameView, SourceError>
    where
        S: SubjectSource + ?Sized,
    {
        let current = match self.current_subject() {
            Some(id) => {
                let subject = source.fetch_subject(id)?;
                if subject.is_none() {
                    warn!(subject = %id, "Current subject missing from source");
                }
                subject
            }
            None => None,
        };
        Ok(self.view(current))
    }
}
