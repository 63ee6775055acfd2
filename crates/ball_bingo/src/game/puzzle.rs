//! Validated puzzle definition.

use std::collections::HashSet;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::types::Cell;
use crate::subject::SubjectId;

/// A puzzle that breaks a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PuzzleError {
    /// The puzzle has no cells.
    #[display("Puzzle has no cells")]
    Empty,

    /// Cell count and deck length differ.
    #[display("Puzzle has {cells} cells but the deck holds {deck} subjects")]
    LengthMismatch {
        /// Number of cells.
        cells: usize,
        /// Deck length.
        deck: usize,
    },

    /// A subject appears twice in the deck.
    #[display("Subject {_0} appears more than once in the deck")]
    DuplicateDeckEntry(#[error(not(source))] SubjectId),

    /// Two cells share a solution subject.
    #[display("Subject {_0} solves more than one cell")]
    DuplicateSolution(#[error(not(source))] SubjectId),

    /// A deck subject solves no cell.
    #[display("Deck subject {_0} has no cell")]
    UnmatchedDeckEntry(#[error(not(source))] SubjectId),

    /// A restored session breaks a session invariant.
    #[display("Inconsistent session: {violations}")]
    InconsistentSession {
        /// Descriptions of the broken invariants.
        violations: String,
    },
}

/// Cells plus the order their subjects are revealed in.
///
/// The deck is always a permutation of the cell solutions. Deserialization
/// goes through the same validation as [`Puzzle::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleParts")]
pub struct Puzzle {
    cells: Vec<Cell>,
    deck: Vec<SubjectId>,
}

#[derive(Deserialize)]
struct PuzzleParts {
    cells: Vec<Cell>,
    deck: Vec<SubjectId>,
}

impl TryFrom<PuzzleParts> for Puzzle {
    type Error = PuzzleError;

    fn try_from(parts: PuzzleParts) -> Result<Self, Self::Error> {
        Self::new(parts.cells, parts.deck)
    }
}

impl Puzzle {
    /// Creates a puzzle from presentation-ordered cells and a reveal-ordered
    /// deck.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError`] unless the deck is a permutation of the cell
    /// solutions with no repeats.
    #[instrument(skip(cells, deck), fields(cells = cells.len(), deck = deck.len()))]
    pub fn new(cells: Vec<Cell>, deck: Vec<SubjectId>) -> Result<Self, PuzzleError> {
        if cells.is_empty() {
            return Err(PuzzleError::Empty);
        }
        if cells.len() != deck.len() {
            return Err(PuzzleError::LengthMismatch {
                cells: cells.len(),
                deck: deck.len(),
            });
        }

        let mut solutions = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !solutions.insert(*cell.solution()) {
                warn!(subject = %cell.solution(), "Duplicate cell solution");
                return Err(PuzzleError::DuplicateSolution(*cell.solution()));
            }
        }

        let mut revealed = HashSet::with_capacity(deck.len());
        for id in &deck {
            if !revealed.insert(*id) {
                warn!(subject = %id, "Duplicate deck entry");
                return Err(PuzzleError::DuplicateDeckEntry(*id));
            }
            if !solutions.contains(id) {
                warn!(subject = %id, "Deck entry without a cell");
                return Err(PuzzleError::UnmatchedDeckEntry(*id));
            }
        }

        Ok(Self { cells, deck })
    }

    /// Cells in presentation order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Subjects in reveal order.
    pub fn deck(&self) -> &[SubjectId] {
        &self.deck
    }

    /// Number of cells (and deck entries).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed puzzle.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }
}
