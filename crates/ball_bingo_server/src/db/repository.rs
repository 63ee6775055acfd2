//! Player repository backed by SQLite.

use std::collections::HashMap;

use ball_bingo::{ClubStint, Fact, FactConfig, Honor, SourceError, Subject, SubjectId, SubjectSource};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::models::{HonorRow, NewPlayer, NewPlayerClub, NewPlayerTitle, StintRow};
use crate::db::{DbError, PlayerRecord, PlayerRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

define_sql_function! {
    /// SQLite `random()`.
    fn random() -> Integer;
}

/// Database repository for players and their career facts.
#[derive(Debug, Clone)]
pub struct PlayerRepository {
    db_path: String,
    fact_config: FactConfig,
}

impl PlayerRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path, fact_config), fields(db_path = %db_path))]
    pub fn new(db_path: String, fact_config: FactConfig) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, style = %fact_config.style(), "Creating PlayerRepository");
        Ok(Self {
            db_path,
            fact_config,
        })
    }

    /// Path of the backing database.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Fact rendering settings used by [`SubjectSource::fetch_facts`].
    pub fn fact_config(&self) -> &FactConfig {
        &self.fact_config
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Inserts a player with its clubs and titles in one transaction.
    ///
    /// Clubs and titles are shared by name across players.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is blank or a database error occurs.
    #[instrument(skip(self, record), fields(name = %record.name()))]
    pub fn insert_player(&self, record: &PlayerRecord) -> Result<SubjectId, DbError> {
        if record.name().trim().is_empty() {
            return Err(DbError::new("Player name is empty"));
        }
        let mut conn = self.connection()?;

        let player_id = conn.transaction::<_, DbError, _>(|conn| {
            let player_id: i32 = diesel::insert_into(schema::players::table)
                .values(NewPlayer::new(
                    record.name(),
                    record.nationality().as_deref(),
                    record.position().as_deref(),
                ))
                .returning(schema::players::id)
                .get_result(conn)?;

            for stint in record.clubs() {
                let club_id = find_or_create_club(conn, stint.club())?;
                diesel::insert_into(schema::player_clubs::table)
                    .values(NewPlayerClub::new(
                        player_id,
                        club_id,
                        *stint.from_year(),
                        *stint.to_year(),
                    ))
                    .execute(conn)?;
            }

            for honor in record.titles() {
                let title_id = find_or_create_title(conn, honor.title())?;
                diesel::insert_into(schema::player_titles::table)
                    .values(NewPlayerTitle::new(player_id, title_id, *honor.year()))
                    .execute(conn)?;
            }

            Ok(player_id)
        })?;

        debug!(player_id, "Player inserted");
        Ok(SubjectId::from(player_id))
    }

    /// Inserts every record, returning the assigned ids in input order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on the first failed insert.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn import(&self, records: &[PlayerRecord]) -> Result<Vec<SubjectId>, DbError> {
        let ids = records
            .iter()
            .map(|record| self.insert_player(record))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = ids.len(), "Players imported");
        Ok(ids)
    }

    /// Number of stored players.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_players(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let count = schema::players::table.count().get_result(&mut conn)?;
        Ok(count)
    }

    /// Up to `n` players in random order, with career history loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn random_players(&self, n: usize) -> Result<Vec<Subject>, DbError> {
        let limit = i64::try_from(n).map_err(|_| DbError::new(format!("Pool size {n} too large")))?;
        let mut conn = self.connection()?;

        let rows = schema::players::table
            .order(random())
            .limit(limit)
            .select(PlayerRow::as_select())
            .load(&mut conn)?;

        let subjects = load_careers(&mut conn, rows)?;
        debug!(requested = n, returned = subjects.len(), "Random players loaded");
        Ok(subjects)
    }

    /// Loads one player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, id: SubjectId) -> Result<Option<Subject>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::players::table
            .find(id.get())
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(load_careers(&mut conn, vec![row])?.pop()),
            None => {
                debug!("Player not found");
                Ok(None)
            }
        }
    }

    /// Loads the given players over one connection, keyed by id. Unknown
    /// ids are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn get_players(&self, ids: &[SubjectId]) -> Result<HashMap<SubjectId, Subject>, DbError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.connection()?;
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let rows = schema::players::table
            .filter(schema::players::id.eq_any(raw))
            .select(PlayerRow::as_select())
            .load(&mut conn)?;

        let players: HashMap<SubjectId, Subject> = load_careers(&mut conn, rows)?
            .into_iter()
            .map(|subject| (*subject.id(), subject))
            .collect();
        debug!(requested = ids.len(), found = players.len(), "Players loaded");
        Ok(players)
    }
}

/// Finds or creates a club by name.
fn find_or_create_club(conn: &mut SqliteConnection, name: &str) -> Result<i32, DbError> {
    let existing = schema::clubs::table
        .filter(schema::clubs::name.eq(name))
        .select(schema::clubs::id)
        .first::<i32>(conn)
        .optional()?;
    match existing {
        Some(id) => Ok(id),
        None => Ok(diesel::insert_into(schema::clubs::table)
            .values(schema::clubs::name.eq(name))
            .returning(schema::clubs::id)
            .get_result(conn)?),
    }
}

/// Finds or creates a title by name.
fn find_or_create_title(conn: &mut SqliteConnection, name: &str) -> Result<i32, DbError> {
    let existing = schema::titles::table
        .filter(schema::titles::name.eq(name))
        .select(schema::titles::id)
        .first::<i32>(conn)
        .optional()?;
    match existing {
        Some(id) => Ok(id),
        None => Ok(diesel::insert_into(schema::titles::table)
            .values(schema::titles::name.eq(name))
            .returning(schema::titles::id)
            .get_result(conn)?),
    }
}

/// Attaches clubs and titles to each row, preserving row order and stored
/// career order.
fn load_careers(
    conn: &mut SqliteConnection,
    rows: Vec<PlayerRow>,
) -> Result<Vec<Subject>, DbError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|row| *row.id()).collect();

    let stints: Vec<StintRow> = schema::player_clubs::table
        .inner_join(schema::clubs::table)
        .filter(schema::player_clubs::player_id.eq_any(ids.clone()))
        .order((
            schema::player_clubs::player_id.asc(),
            schema::player_clubs::id.asc(),
        ))
        .select((
            schema::player_clubs::player_id,
            schema::clubs::name,
            schema::player_clubs::from_year,
            schema::player_clubs::to_year,
        ))
        .load(conn)?;

    let honors: Vec<HonorRow> = schema::player_titles::table
        .inner_join(schema::titles::table)
        .filter(schema::player_titles::player_id.eq_any(ids))
        .order((
            schema::player_titles::player_id.asc(),
            schema::player_titles::id.asc(),
        ))
        .select((
            schema::player_titles::player_id,
            schema::titles::name,
            schema::player_titles::year,
        ))
        .load(conn)?;

    let mut clubs: HashMap<i32, Vec<ClubStint>> = HashMap::new();
    for stint in stints {
        clubs.entry(stint.player_id).or_default().push(stint.into());
    }
    let mut titles: HashMap<i32, Vec<Honor>> = HashMap::new();
    for honor in honors {
        titles.entry(honor.player_id).or_default().push(honor.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = *row.id();
            row.into_subject(
                clubs.remove(&id).unwrap_or_default(),
                titles.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

impl SubjectSource for PlayerRepository {
    fn fetch_random_subjects(&self, n: usize) -> Result<Vec<Subject>, SourceError> {
        Ok(self.random_players(n)?)
    }

    fn fetch_facts(&self, id: SubjectId) -> Result<Vec<Fact>, SourceError> {
        Ok(self
            .get_player(id)?
            .map(|subject| subject.facts(&self.fact_config))
            .unwrap_or_default())
    }

    fn fetch_subject(&self, id: SubjectId) -> Result<Option<Subject>, SourceError> {
        Ok(self.get_player(id)?)
    }

    fn fetch_facts_many(
        &self,
        ids: &[SubjectId],
    ) -> Result<Vec<(SubjectId, Vec<Fact>)>, SourceError> {
        let players = self.get_players(ids)?;
        Ok(ids
            .iter()
            .map(|id| {
                let facts = players
                    .get(id)
                    .map(|subject| subject.facts(&self.fact_config))
                    .unwrap_or_default();
                (*id, facts)
            })
            .collect())
    }
}
