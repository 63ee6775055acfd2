//! Subjects: the players a puzzle is built around.

use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Unique key of a subject in the data source.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct SubjectId(i32);

impl SubjectId {
    /// Returns the raw key.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// A spell at a club, optionally bounded by years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ClubStint {
    /// Club name.
    club: String,
    /// First season at the club.
    from_year: Option<i32>,
    /// Last season at the club; `None` while still there or when unknown.
    to_year: Option<i32>,
}

/// A title won, optionally with the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Honor {
    /// Title name.
    title: String,
    /// Year the title was won.
    year: Option<i32>,
}

/// A player with the attributes facts are rendered from.
///
/// Subjects are immutable once fetched from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Subject {
    id: SubjectId,
    name: String,
    #[serde(default)]
    nationality: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    clubs: Vec<ClubStint>,
    #[serde(default)]
    titles: Vec<Honor>,
}

impl Subject {
    /// Creates a subject with no descriptive attributes.
    pub fn new(id: impl Into<SubjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nationality: None,
            position: None,
            clubs: Vec::new(),
            titles: Vec::new(),
        }
    }

    /// Sets the nationality.
    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }

    /// Sets the playing position.
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Appends a club stint. Stints keep insertion order.
    pub fn with_club(mut self, stint: ClubStint) -> Self {
        self.clubs.push(stint);
        self
    }

    /// Appends a title. Titles keep insertion order.
    pub fn with_title(mut self, honor: Honor) -> Self {
        self.titles.push(honor);
        self
    }
}
