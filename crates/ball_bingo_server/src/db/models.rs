//! Database models and import records.

use ball_bingo::{ClubStint, Honor, Subject};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// Player database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct PlayerRow {
    id: i32,
    name: String,
    nationality: Option<String>,
    position: Option<String>,
}

impl PlayerRow {
    /// Builds a subject from this row and its loaded career history.
    pub fn into_subject(self, clubs: Vec<ClubStint>, titles: Vec<Honor>) -> Subject {
        let mut subject = Subject::new(self.id, self.name);
        if let Some(nationality) = self.nationality {
            subject = subject.with_nationality(nationality);
        }
        if let Some(position) = self.position {
            subject = subject.with_position(position);
        }
        let subject = clubs.into_iter().fold(subject, Subject::with_club);
        titles.into_iter().fold(subject, Subject::with_title)
    }
}

/// Insertable player model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer<'a> {
    name: &'a str,
    nationality: Option<&'a str>,
    position: Option<&'a str>,
}

/// Insertable club membership.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_clubs)]
pub struct NewPlayerClub {
    player_id: i32,
    club_id: i32,
    from_year: Option<i32>,
    to_year: Option<i32>,
}

/// Insertable title award.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_titles)]
pub struct NewPlayerTitle {
    player_id: i32,
    title_id: i32,
    year: Option<i32>,
}

/// A club stint joined with its club name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct StintRow {
    pub player_id: i32,
    pub club: String,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

impl From<StintRow> for ClubStint {
    fn from(row: StintRow) -> Self {
        ClubStint::new(row.club, row.from_year, row.to_year)
    }
}

/// A title award joined with its title name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct HonorRow {
    pub player_id: i32,
    pub title: String,
    pub year: Option<i32>,
}

impl From<HonorRow> for Honor {
    fn from(row: HonorRow) -> Self {
        Honor::new(row.title, row.year)
    }
}

/// A player as read from an import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct PlayerRecord {
    name: String,
    #[serde(default)]
    nationality: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    #[new(default)]
    clubs: Vec<ClubRecord>,
    #[serde(default)]
    #[new(default)]
    titles: Vec<TitleRecord>,
}

impl PlayerRecord {
    /// Adds a club stint.
    pub fn with_club(mut self, club: ClubRecord) -> Self {
        self.clubs.push(club);
        self
    }

    /// Adds a title award.
    pub fn with_title(mut self, title: TitleRecord) -> Self {
        self.titles.push(title);
        self
    }
}

/// A club stint in an import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct ClubRecord {
    club: String,
    #[serde(default)]
    from_year: Option<i32>,
    #[serde(default)]
    to_year: Option<i32>,
}

/// A title award in an import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct TitleRecord {
    title: String,
    #[serde(default)]
    year: Option<i32>,
}
