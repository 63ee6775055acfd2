//! Ball Bingo - fair football-bingo puzzles
//!
//! A puzzle is a grid of cells, each holding a fact about a hidden player,
//! plus a deck of the same players revealed one at a time. The player must
//! place each revealed player on the one cell whose fact identifies them.
//!
//! # Architecture
//!
//! - **Source**: [`SubjectSource`] is the only seam to stored player data
//! - **Generator**: [`PuzzleGenerator`] builds puzzles whose facts are unique
//!   within the candidate pool
//! - **Game**: [`GameSession`] referees moves until the game is won or lost
//!
//! # Example
//!
//! ```no_run
//! use ball_bingo::{FactConfig, GameSession, GeneratorConfig, InMemorySource, PuzzleGenerator};
//!
//! # fn example(subjects: Vec<ball_bingo::Subject>) -> Result<(), Box<dyn std::error::Error>> {
//! let source = InMemorySource::new(subjects, FactConfig::default());
//! let puzzle = PuzzleGenerator::new(&source, GeneratorConfig::default()).generate()?;
//!
//! let mut session = GameSession::new(puzzle);
//! let result = session.submit_move(0)?;
//! println!("{}", result.is_correct());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod facts;
mod game;
mod generator;
mod source;
mod subject;

pub use facts::{Fact, FactConfig, FactStyle, dedup_facts};
pub use game::invariants::{
    Invariant, InvariantSet, InvariantViolation, ProgressBoundedInvariant,
    RevealedCellsCorrectInvariant, SessionInvariants, SingleWrongCellInvariant,
};
pub use game::{
    Cell, CellState, CellView, GameSession, GameStatus, GameView, MoveError, MoveResponse,
    MoveResult, Puzzle, PuzzleError, Rejection,
};
pub use generator::{GRID_SIZE, GenerateError, GeneratorConfig, PuzzleGenerator};
pub use source::{InMemorySource, SourceError, SubjectSource};
pub use subject::{ClubStint, Honor, Subject, SubjectId};
