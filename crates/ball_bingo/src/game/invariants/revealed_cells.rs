//! Revealed-cells invariant: correct cells are exactly the placed subjects.

use std::collections::HashSet;

use super::Invariant;
use crate::game::{CellState, GameSession};

/// Invariant: the cells marked correct are solved by exactly the subjects in
/// `deck[..deck_index]`.
///
/// This rules out a move touching any cell but its target, and any cell
/// being marked correct without advancing the deck.
pub struct RevealedCellsCorrectInvariant;

impl Invariant<GameSession> for RevealedCellsCorrectInvariant {
    fn holds(game: &GameSession) -> bool {
        let Some(placed) = game.puzzle().deck().get(..game.deck_index()) else {
            return false;
        };
        let placed: HashSet<_> = placed.iter().copied().collect();

        let correct: HashSet<_> = game
            .puzzle()
            .cells()
            .iter()
            .filter(|cell| *cell.state() == CellState::Correct)
            .map(|cell| *cell.solution())
            .collect();

        correct == placed
    }

    fn description() -> &'static str {
        "Correct cells are solved by exactly the subjects already placed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use crate::game::invariants::fixtures::{cell_of, session};

    #[test]
    fn test_holds_after_correct_moves() {
        let mut game = session();
        game.submit_move(cell_of(2)).expect("valid move");
        game.submit_move(cell_of(3)).expect("valid move");
        assert!(RevealedCellsCorrectInvariant::holds(&game));
    }

    #[test]
    fn test_marked_cell_without_progress_violates() {
        let mut game = session();
        if let Some(cell) = game.puzzle_mut().cell_mut(cell_of(1)) {
            cell.mark(CellState::Correct);
        }
        assert!(!RevealedCellsCorrectInvariant::holds(&game));
    }

    #[test]
    fn test_progress_without_marked_cell_violates() {
        let game = session();
        let corrupted =
            GameSession::from_parts_unchecked(game.puzzle().clone(), 1, GameStatus::InProgress);
        assert!(!RevealedCellsCorrectInvariant::holds(&corrupted));
    }
}
