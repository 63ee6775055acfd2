//! Fair puzzle generation.
//!
//! Each attempt draws a fresh pool of subjects, indexes every fact the pool
//! renders, and keeps only subjects that own a fact no other pool subject
//! shares. A cell anchored on such a fact can only ever match its own
//! subject, so every revealed subject has exactly one valid cell.

mod config;
mod error;
mod index;

pub use config::{GRID_SIZE, GeneratorConfig};
pub use error::GenerateError;

use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info, instrument, warn};

use crate::facts::{Fact, dedup_facts};
use crate::game::{Cell, Puzzle};
use crate::source::SubjectSource;
use crate::subject::{Subject, SubjectId};
use index::{Candidate, FactIndex, rank};

/// Builds puzzles from a [`SubjectSource`].
#[derive(Debug, Clone)]
pub struct PuzzleGenerator<'a, S: ?Sized> {
    source: &'a S,
    config: GeneratorConfig,
}

impl<'a, S> PuzzleGenerator<'a, S>
where
    S: SubjectSource + ?Sized,
{
    /// Creates a generator over the given source.
    pub fn new(source: &'a S, config: GeneratorConfig) -> Self {
        Self { source, config }
    }

    /// Returns the generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a puzzle using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`PuzzleGenerator::generate_with_rng`].
    pub fn generate(&self) -> Result<Puzzle, GenerateError> {
        self.generate_with_rng(&mut rand::rng())
    }

    /// Generates a puzzle, drawing fact choices and shuffles from `rng`.
    ///
    /// Makes at most `max_tries` attempts, each with a fresh pool.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::InsufficientData`] as soon as a pool comes back
    ///   smaller than the target; no further attempts are made.
    /// - [`GenerateError::GenerationFailed`] when every attempt ends with too
    ///   few candidates.
    /// - [`GenerateError::Source`] when the source fails.
    /// - [`GenerateError::InvalidConfig`] for an unusable configuration.
    #[instrument(skip(self, rng), fields(
        pool_size = self.config.pool_size(),
        target = self.config.target(),
        max_tries = self.config.max_tries(),
    ))]
    pub fn generate_with_rng<R>(&self, rng: &mut R) -> Result<Puzzle, GenerateError>
    where
        R: Rng + ?Sized,
    {
        self.config.validate()?;
        let max_tries = *self.config.max_tries();

        for attempt in 1..=max_tries {
            match self.attempt(rng)? {
                Some(puzzle) => {
                    info!(attempt, cells = puzzle.cells().len(), "Puzzle generated");
                    return Ok(puzzle);
                }
                None => debug!(attempt, "Attempt produced too few candidates, retrying"),
            }
        }

        warn!(attempts = max_tries, "Giving up on puzzle generation");
        Err(GenerateError::GenerationFailed {
            attempts: max_tries,
        })
    }

    /// One pass over a fresh pool. `Ok(None)` means too few candidates.
    fn attempt<R>(&self, rng: &mut R) -> Result<Option<Puzzle>, GenerateError>
    where
        R: Rng + ?Sized,
    {
        let target = *self.config.target();

        let pool = distinct_by_id(self.source.fetch_random_subjects(*self.config.pool_size())?);
        if pool.len() < target {
            warn!(available = pool.len(), required = target, "Source has too few subjects");
            return Err(GenerateError::InsufficientData {
                available: pool.len(),
                required: target,
            });
        }

        let ids: Vec<SubjectId> = pool.iter().map(|s| *s.id()).collect();
        let entries: Vec<(SubjectId, Vec<Fact>)> = self
            .source
            .fetch_facts_many(&ids)?
            .into_iter()
            .map(|(id, facts)| (id, dedup_facts(facts)))
            .collect();

        let index = FactIndex::build(&entries);
        let mut candidates = index.candidates(&entries);
        if candidates.len() < target {
            debug!(
                candidates = candidates.len(),
                required = target,
                "Not enough subjects with a unique fact"
            );
            return Ok(None);
        }

        rank(&mut candidates);
        candidates.truncate(target);

        let (cells, deck) = deal(candidates, rng)?;
        Ok(Some(Puzzle::new(cells, deck)?))
    }
}

/// Anchors each candidate on one of its unique facts, then shuffles the
/// grid and the reveal order independently.
fn deal<R>(
    candidates: Vec<Candidate>,
    rng: &mut R,
) -> Result<(Vec<Cell>, Vec<SubjectId>), GenerateError>
where
    R: Rng + ?Sized,
{
    let mut cells = Vec::with_capacity(candidates.len());
    let mut deck = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let fact = candidate
            .unique_facts
            .choose(rng)
            .ok_or(GenerateError::NoUniqueFact {
                subject: candidate.id,
            })?;
        cells.push(Cell::new(fact.clone(), candidate.id));
        deck.push(candidate.id);
    }

    cells.shuffle(rng);
    deck.shuffle(rng);
    Ok((cells, deck))
}

/// Keeps the first occurrence of each subject id, preserving fetch order.
fn distinct_by_id(subjects: Vec<Subject>) -> Vec<Subject> {
    let mut seen: HashSet<SubjectId> = HashSet::new();
    subjects
        .into_iter()
        .filter(|s| seen.insert(*s.id()))
        .collect()
}
