//! Per-player game sessions shared across requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ball_bingo::{GameSession, MoveError, MoveResult};
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument};

/// Player identifier taken from the request path.
pub type PlayerId = String;

/// Failure to apply a move to a player's session.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The player has no game in progress or finished.
    #[display("No game for player {}", _0)]
    #[from(ignore)]
    NoGame(#[error(not(source))] PlayerId),
    /// The move itself was malformed.
    #[display("{}", _0)]
    InvalidMove(MoveError),
}

/// Sessions kept before installing a new player evicts one.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Slot {
    session: GameSession,
    installed: u64,
}

#[derive(Debug, Default)]
struct SessionTable {
    slots: HashMap<PlayerId, Slot>,
    installs: u64,
}

impl SessionTable {
    /// Oldest finished session, or the oldest session if none has finished.
    fn eviction_candidate(&self) -> Option<PlayerId> {
        self.slots
            .iter()
            .min_by_key(|(_, slot)| (!slot.session.status().is_terminal(), slot.installed))
            .map(|(player, _)| player.clone())
    }
}

/// Holds one session per player, up to a fixed number of players.
///
/// Cloning shares the underlying table. Each move runs under the table lock,
/// so concurrent moves for the same player are applied one at a time.
#[derive(Debug, Clone)]
pub struct SessionManager {
    table: Arc<Mutex<SessionTable>>,
    max_sessions: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionManager {
    /// Creates an empty session manager holding [`DEFAULT_MAX_SESSIONS`].
    #[instrument]
    pub fn new() -> Self {
        info!("Creating SessionManager");
        Self::default()
    }

    /// Creates an empty session manager holding at most `max_sessions`
    /// players (at least one).
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            table: Arc::new(Mutex::new(SessionTable::default())),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Maximum number of players held at once.
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn lock(&self) -> MutexGuard<'_, SessionTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs a fresh session for the player, replacing any previous one.
    ///
    /// When a new player arrives at capacity, the oldest finished session is
    /// evicted, or the oldest session if every game is still running.
    #[instrument(skip(self, session), fields(deck_len = session.puzzle().len()))]
    pub fn install(&self, player: PlayerId, session: GameSession) {
        let mut table = self.lock();
        if !table.slots.contains_key(&player) && table.slots.len() >= self.max_sessions {
            if let Some(evicted) = table.eviction_candidate() {
                table.slots.remove(&evicted);
                info!(%evicted, max_sessions = self.max_sessions, "Session evicted");
            }
        }
        table.installs += 1;
        let installed = table.installs;
        let replaced = table
            .slots
            .insert(player, Slot { session, installed })
            .is_some();
        info!(replaced, "Session installed");
    }

    /// Returns a copy of the player's session.
    #[instrument(skip(self))]
    pub fn get(&self, player: &str) -> Option<GameSession> {
        let session = self.lock().slots.get(player).map(|slot| slot.session.clone());
        debug!(found = session.is_some(), "Session lookup");
        session
    }

    /// Applies a move to the player's session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoGame`] if the player has no session and
    /// [`SessionError::InvalidMove`] if the cell index is out of range.
    #[instrument(skip(self))]
    pub fn submit_move(&self, player: &str, cell_index: usize) -> Result<MoveResult, SessionError> {
        let mut table = self.lock();
        let session = &mut table
            .slots
            .get_mut(player)
            .ok_or_else(|| SessionError::NoGame(player.to_string()))?
            .session;
        let result = session.submit_move(cell_index)?;
        info!(
            ?result,
            deck_index = session.deck_index(),
            status = %session.status(),
            "Move applied"
        );
        Ok(result)
    }

    /// Drops the player's session. Returns whether one existed.
    #[instrument(skip(self))]
    pub fn remove(&self, player: &str) -> bool {
        let removed = self.lock().slots.remove(player).is_some();
        info!(removed, "Session removed");
        removed
    }

    /// Number of players with a session.
    pub fn session_count(&self) -> usize {
        self.lock().slots.len()
    }
}
