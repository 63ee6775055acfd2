//! The data source seam.

use derive_more::{Display, Error};
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

use crate::facts::{Fact, FactConfig};
use crate::subject::{Subject, SubjectId};

/// Where subjects and their facts come from.
///
/// Calls may block; the generator treats them as plain synchronous I/O.
pub trait SubjectSource {
    /// Fetches up to `n` random subjects. Fewer are returned when the store
    /// is small.
    fn fetch_random_subjects(&self, n: usize) -> Result<Vec<Subject>, SourceError>;

    /// Fetches the rendered facts for one subject, deduplicated and in
    /// attribute order. A subject with no facts yields an empty list.
    fn fetch_facts(&self, id: SubjectId) -> Result<Vec<Fact>, SourceError>;

    /// Looks up one subject with all of its attributes.
    fn fetch_subject(&self, id: SubjectId) -> Result<Option<Subject>, SourceError>;

    /// Fetches facts for many subjects, one entry per id in input order.
    ///
    /// The generator calls this once per attempt. Stores that pay per call
    /// should override it with a batched lookup.
    fn fetch_facts_many(
        &self,
        ids: &[SubjectId],
    ) -> Result<Vec<(SubjectId, Vec<Fact>)>, SourceError> {
        ids.iter()
            .map(|&id| Ok((id, self.fetch_facts(id)?)))
            .collect()
    }
}

/// Data source failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Source error: {} at {}:{}", message, file, line)]
pub struct SourceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SourceError {
    /// Creates a new source error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A source over a fixed list of subjects.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    subjects: Vec<Subject>,
    fact_config: FactConfig,
}

impl InMemorySource {
    /// Creates a source over the given subjects.
    #[instrument(skip(subjects), fields(count = subjects.len()))]
    pub fn new(subjects: Vec<Subject>, fact_config: FactConfig) -> Self {
        debug!("Creating in-memory subject source");
        Self {
            subjects,
            fact_config,
        }
    }

    /// Returns every subject in the source.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }
}

impl SubjectSource for InMemorySource {
    #[instrument(skip(self))]
    fn fetch_random_subjects(&self, n: usize) -> Result<Vec<Subject>, SourceError> {
        let picked: Vec<Subject> = self
            .subjects
            .choose_multiple(&mut rand::rng(), n)
            .cloned()
            .collect();
        debug!(requested = n, returned = picked.len(), "Sampled subjects");
        Ok(picked)
    }

    #[instrument(skip(self))]
    fn fetch_facts(&self, id: SubjectId) -> Result<Vec<Fact>, SourceError> {
        Ok(self
            .subjects
            .iter()
            .find(|s| *s.id() == id)
            .map(|s| s.facts(&self.fact_config))
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    fn fetch_subject(&self, id: SubjectId) -> Result<Option<Subject>, SourceError> {
        Ok(self.subjects.iter().find(|s| *s.id() == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(count: i32) -> InMemorySource {
        let subjects = (1..=count)
            .map(|i| Subject::new(i, format!("Player {i}")).with_nationality(format!("Land {i}")))
            .collect();
        InMemorySource::new(subjects, FactConfig::default())
    }

    #[test]
    fn test_random_subjects_capped_by_store_size() {
        let source = source(5);
        let picked = source.fetch_random_subjects(80).expect("fetch");
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn test_random_subjects_have_no_repeats() {
        let source = source(40);
        let mut ids: Vec<_> = source
            .fetch_random_subjects(20)
            .expect("fetch")
            .iter()
            .map(|s| *s.id())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_facts_for_unknown_subject_are_empty() {
        let source = source(3);
        let facts = source.fetch_facts(SubjectId::from(99)).expect("fetch");
        assert!(facts.is_empty());
    }

    #[test]
    fn test_fetch_facts_many_keeps_input_order() {
        let source = source(3);
        let ids = [3, 99, 1].map(SubjectId::from);

        let entries = source.fetch_facts_many(&ids).expect("fetch");

        let order: Vec<SubjectId> = entries.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, ids.to_vec());
        assert_eq!(entries[0].1, vec![Fact::new("Nationality: Land 3")]);
        assert!(entries[1].1.is_empty());
    }

    #[test]
    fn test_fetch_subject() {
        let source = source(3);
        let found = source.fetch_subject(SubjectId::from(2)).expect("fetch");
        assert_eq!(found.map(|s| s.name().clone()), Some("Player 2".to_string()));
    }
}
