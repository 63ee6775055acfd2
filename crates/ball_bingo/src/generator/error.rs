//! Generation errors.

use derive_more::{Display, Error, From};

use crate::game::PuzzleError;
use crate::source::SourceError;
use crate::subject::SubjectId;

/// Why a puzzle could not be generated.
#[derive(Debug, Clone, Display, Error, From)]
pub enum GenerateError {
    /// The source cannot supply enough subjects. Retrying will not help.
    #[display("Not enough players: source returned {available}, need {required}")]
    #[from(ignore)]
    InsufficientData {
        /// Distinct subjects the source returned.
        available: usize,
        /// Subjects a puzzle needs.
        required: usize,
    },

    /// Every attempt ended with too few subjects owning a pool-unique fact.
    #[display(
        "Could not build a fair game after {attempts} attempts (not enough unique facts). Add more data or increase pool_size."
    )]
    #[from(ignore)]
    GenerationFailed {
        /// Attempts made.
        attempts: usize,
    },

    /// The generator configuration can never produce a puzzle.
    #[display("Invalid generator config: {reason}")]
    #[from(ignore)]
    InvalidConfig {
        /// What is wrong.
        reason: &'static str,
    },

    /// A selected candidate had no pool-unique fact to anchor its cell.
    #[display("Candidate {subject} has no unique fact")]
    #[from(ignore)]
    NoUniqueFact {
        /// The candidate subject.
        subject: SubjectId,
    },

    /// The data source failed.
    #[display("{_0}")]
    Source(SourceError),

    /// An assembled puzzle broke a puzzle invariant.
    #[display("{_0}")]
    Puzzle(PuzzleError),
}
