//! Reverse index from facts to the pool subjects that render them.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::facts::Fact;
use crate::subject::SubjectId;

/// A pool subject and the facts it owns alone within the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) id: SubjectId,
    pub(crate) unique_facts: Vec<Fact>,
}

/// Fact -> owners, built over one pool.
#[derive(Debug, Default)]
pub(crate) struct FactIndex {
    owners: HashMap<Fact, HashSet<SubjectId>>,
}

impl FactIndex {
    /// Indexes every `(subject, facts)` entry of a pool.
    #[instrument(skip(entries), fields(subjects = entries.len()))]
    pub(crate) fn build(entries: &[(SubjectId, Vec<Fact>)]) -> Self {
        let mut owners: HashMap<Fact, HashSet<SubjectId>> = HashMap::new();
        for (id, facts) in entries {
            for fact in facts {
                owners.entry(fact.clone()).or_default().insert(*id);
            }
        }
        debug!(distinct_facts = owners.len(), "Fact index built");
        Self { owners }
    }

    /// True when exactly one pool subject renders `fact`.
    pub(crate) fn is_unique(&self, fact: &Fact) -> bool {
        self.owners.get(fact).is_some_and(|ids| ids.len() == 1)
    }

    /// Subjects owning at least one unique fact, in pool order. Each keeps
    /// its unique facts in its own fact order.
    #[instrument(skip(self, entries))]
    pub(crate) fn candidates(&self, entries: &[(SubjectId, Vec<Fact>)]) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = entries
            .iter()
            .filter_map(|(id, facts)| {
                let unique_facts: Vec<Fact> = facts
                    .iter()
                    .filter(|fact| self.is_unique(fact))
                    .cloned()
                    .collect();
                (!unique_facts.is_empty()).then_some(Candidate {
                    id: *id,
                    unique_facts,
                })
            })
            .collect();
        debug!(candidates = candidates.len(), "Candidates selected");
        candidates
    }
}

/// Orders candidates by descending unique-fact count. Ties keep pool order.
pub(crate) fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.unique_facts.len().cmp(&a.unique_facts.len()));
}
