//! Loss invariant: a lost game has exactly one wrong cell.

use super::Invariant;
use crate::game::{CellState, GameSession, GameStatus};

/// Invariant: one wrong cell if the game is lost, none otherwise.
pub struct SingleWrongCellInvariant;

impl Invariant<GameSession> for SingleWrongCellInvariant {
    fn holds(game: &GameSession) -> bool {
        let wrong = game
            .puzzle()
            .cells()
            .iter()
            .filter(|cell| *cell.state() == CellState::Wrong)
            .count();

        let expected = usize::from(game.status() == GameStatus::Lost);
        wrong == expected
    }

    fn description() -> &'static str {
        "A lost game has exactly one wrong cell and any other game has none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::invariants::fixtures::{cell_of, session};

    #[test]
    fn test_holds_after_loss() {
        let mut game = session();
        game.submit_move(cell_of(3)).expect("valid move");
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(SingleWrongCellInvariant::holds(&game));
    }

    #[test]
    fn test_lost_without_wrong_cell_violates() {
        let game = session();
        let corrupted =
            GameSession::from_parts_unchecked(game.puzzle().clone(), 0, GameStatus::Lost);
        assert!(!SingleWrongCellInvariant::holds(&corrupted));
    }

    #[test]
    fn test_wrong_cell_while_in_progress_violates() {
        let mut game = session();
        if let Some(cell) = game.puzzle_mut().cell_mut(cell_of(1)) {
            cell.mark(CellState::Wrong);
        }
        assert!(!SingleWrongCellInvariant::holds(&game));
    }
}
