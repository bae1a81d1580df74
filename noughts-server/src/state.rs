//! Server state management
//!
//! Every browser session owns one `Game` behind its own lock, so searches
//! never share a board buffer and never hold the session map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use noughts_core::{Game, SearchMode};

/// Sessions kept before the oldest ones are evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// One live session
pub type SharedGame = Arc<Mutex<Game>>;

struct Session {
    /// Creation order, for eviction
    seq: u64,
    game: SharedGame,
}

/// Server-wide shared state
pub struct ServerState {
    /// Engine used for new games and stateless queries
    pub mode: SearchMode,
    max_sessions: usize,
    games: RwLock<HashMap<String, Session>>,
    next_id: AtomicU64,
}

impl ServerState {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            max_sessions: DEFAULT_MAX_SESSIONS,
            games: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Cap on live sessions (at least one)
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Store a game and return its id.
    ///
    /// At the cap, the oldest finished session is dropped first, then the
    /// oldest session of any kind.
    pub fn insert_game(&self, game: Game) -> String {
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = format!("g{}", seq);

        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        while games.len() >= self.max_sessions {
            let Some(victim) = eviction_candidate(&games) else {
                break;
            };
            games.remove(&victim);
            tracing::debug!(id = %victim, "session evicted");
        }

        let game = Arc::new(Mutex::new(game));
        games.insert(id.clone(), Session { seq, game });
        id
    }

    /// Handle to a session; the map lock is released before this returns
    pub fn game(&self, id: &str) -> Option<SharedGame> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(id).map(|s| Arc::clone(&s.game))
    }

    /// Drop a session; `false` if it did not exist
    pub fn remove_game(&self, id: &str) -> bool {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.remove(id).is_some()
    }

    pub fn game_count(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}

/// Lock one session
pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Oldest finished session, else the oldest one. Sessions busy in another
/// request count as unfinished.
fn eviction_candidate(games: &HashMap<String, Session>) -> Option<String> {
    let finished = games
        .iter()
        .filter(|(_, s)| s.game.try_lock().map(|g| g.is_over()).unwrap_or(false))
        .min_by_key(|(_, s)| s.seq);

    finished
        .or_else(|| games.iter().min_by_key(|(_, s)| s.seq))
        .map(|(id, _)| id.clone())
}
