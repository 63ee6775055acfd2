//! Fact rendering.
//!
//! A fact is a short string derived from exactly one attribute of one
//! subject ("Nationality: France", "Won: Ballon d'Or (1998)"). Two subjects
//! may render the same fact; the generator is responsible for only using
//! facts that single out one subject.

use std::collections::HashSet;

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::subject::Subject;

/// A rendered fact string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct Fact(String);

impl Fact {
    /// Creates a fact from any string.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the fact text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fact {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Which fact vocabulary to render.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FactStyle {
    /// Club and title facts carry their years, which makes them unique far
    /// more often.
    #[default]
    Dated,
    /// Club and title facts are bare names.
    Plain,
}

/// Controls how facts are rendered from a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FactConfig {
    /// Fact vocabulary.
    #[serde(default)]
    style: FactStyle,

    /// At most this many clubs contribute facts, in stored order.
    #[serde(default = "default_max_clubs")]
    max_clubs: usize,

    /// At most this many titles contribute facts, in stored order.
    #[serde(default = "default_max_titles")]
    max_titles: usize,
}

fn default_max_clubs() -> usize {
    10
}

fn default_max_titles() -> usize {
    10
}

impl Default for FactConfig {
    fn default() -> Self {
        Self {
            style: FactStyle::default(),
            max_clubs: default_max_clubs(),
            max_titles: default_max_titles(),
        }
    }
}

impl FactConfig {
    /// Creates a fact configuration.
    pub fn new(style: FactStyle, max_clubs: usize, max_titles: usize) -> Self {
        Self {
            style,
            max_clubs,
            max_titles,
        }
    }

    /// The smaller vocabulary: undated facts, five clubs and five titles.
    pub fn plain() -> Self {
        Self::new(FactStyle::Plain, 5, 5)
    }
}

impl Subject {
    /// Renders this subject's facts, deduplicated, in attribute order:
    /// nationality, position, clubs, titles.
    #[instrument(skip(self, config), fields(subject_id = %self.id(), style = %config.style()))]
    pub fn facts(&self, config: &FactConfig) -> Vec<Fact> {
        let mut rendered = Vec::new();

        if let Some(nationality) = non_blank(self.nationality()) {
            rendered.push(Fact::new(format!("Nationality: {nationality}")));
        }
        if let Some(position) = non_blank(self.position()) {
            rendered.push(Fact::new(format!("Position: {position}")));
        }

        for stint in self.clubs().iter().take(*config.max_clubs()) {
            let club = stint.club();
            let text = match (config.style(), stint.from_year(), stint.to_year()) {
                (FactStyle::Dated, Some(from), Some(to)) => {
                    format!("Played for: {club} ({from}–{to})")
                }
                (FactStyle::Dated, Some(from), None) => {
                    format!("Played for: {club} (since {from})")
                }
                _ => format!("Played for: {club}"),
            };
            rendered.push(Fact::new(text));
        }

        for honor in self.titles().iter().take(*config.max_titles()) {
            let title = honor.title();
            let text = match (config.style(), honor.year()) {
                (FactStyle::Dated, Some(year)) => format!("Won: {title} ({year})"),
                _ => format!("Won: {title}"),
            };
            rendered.push(Fact::new(text));
        }

        dedup_facts(rendered)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Drops repeated facts, keeping each at its first-seen position.
pub fn dedup_facts<I>(facts: I) -> Vec<Fact>
where
    I: IntoIterator<Item = Fact>,
{
    let mut seen = HashSet::new();
    facts
        .into_iter()
        .filter(|fact| seen.insert(fact.clone()))
        .collect()
}
