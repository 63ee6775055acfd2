//! Move outcomes.
//!
//! Player mistakes that leave the game untouched (a filled cell, a finished
//! game) are ordinary [`MoveResult`]s. Only malformed input is a
//! [`MoveError`].

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A move that was refused without changing the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::IntoStaticStr)]
pub enum Rejection {
    /// The game is already won or lost.
    #[strum(serialize = "finished")]
    Finished,
    /// The targeted cell was played before.
    #[strum(serialize = "already filled")]
    AlreadyFilled,
}

impl Rejection {
    /// Machine-readable reason.
    pub fn reason(self) -> &'static str {
        self.into()
    }

    /// Message suitable for showing to the player.
    pub fn message(self) -> &'static str {
        match self {
            Self::Finished => "Game finished. Press Start Game.",
            Self::AlreadyFilled => "Cell already filled.",
        }
    }
}

/// What a move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveResult {
    /// Nothing changed.
    Rejected(Rejection),
    /// The cell did not match the revealed subject; the game is lost.
    Wrong,
    /// The cell matched; `won` is set when that was the last subject.
    Correct {
        /// Whether this move finished the deck.
        won: bool,
    },
}

impl MoveResult {
    /// True when the move was applied (right or wrong).
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    /// True when the move matched the revealed subject.
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    /// True when the move won the game.
    pub fn is_won(&self) -> bool {
        matches!(self, Self::Correct { won: true })
    }

    /// True when the move lost the game.
    pub fn is_lost(&self) -> bool {
        matches!(self, Self::Wrong)
    }

    /// The refusal, if the move was not applied.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

/// Wire form of a move outcome. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the move was applied.
    pub ok: bool,
    /// Whether the move matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    /// Whether the game is now won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub won: Option<bool>,
    /// Whether the game is now lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost: Option<bool>,
    /// Machine-readable refusal reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MoveResponse {
    /// A refusal carrying only a message, for hosts reporting conditions
    /// outside the game itself (such as no active game).
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            correct: None,
            won: None,
            lost: None,
            reason: None,
            message: Some(message.into()),
        }
    }
}

impl From<MoveResult> for MoveResponse {
    fn from(result: MoveResult) -> Self {
        match result {
            MoveResult::Rejected(rejection) => Self {
                reason: Some(rejection.reason().to_string()),
                ..Self::refused(rejection.message())
            },
            MoveResult::Wrong => Self {
                ok: true,
                correct: Some(false),
                won: None,
                lost: Some(true),
                reason: None,
                message: None,
            },
            MoveResult::Correct { won } => Self {
                ok: true,
                correct: Some(true),
                won: Some(won),
                lost: Some(false),
                reason: None,
                message: None,
            },
        }
    }
}

/// Malformed move input. The game is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The cell index is outside the grid.
    #[display("Cell index {index} is out of range (grid has {cells} cells)")]
    InvalidCell {
        /// Requested index.
        index: usize,
        /// Number of cells.
        cells: usize,
    },
}
