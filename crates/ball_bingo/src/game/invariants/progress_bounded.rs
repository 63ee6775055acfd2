//! Progress invariant: the deck index and status agree.

use super::Invariant;
use crate::game::{GameSession, GameStatus};

/// Invariant: `deck_index` never runs past the deck, and the game is won
/// exactly when the whole deck has been placed.
pub struct ProgressBoundedInvariant;

impl Invariant<GameSession> for ProgressBoundedInvariant {
    fn holds(game: &GameSession) -> bool {
        let deck_len = game.puzzle().deck().len();
        let exhausted = game.deck_index() == deck_len;

        game.deck_index() <= deck_len && exhausted == (game.status() == GameStatus::Won)
    }

    fn description() -> &'static str {
        "Deck index stays within the deck and the game is won exactly when it is exhausted"
    }
}
