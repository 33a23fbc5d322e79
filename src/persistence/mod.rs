//! Best score persistence
//!
//! The best score is the only state that outlives a session. It is stored as a
//! plain decimal string under `BEST_SCORE_KEY`. Storage is best-effort: a
//! failed read counts as "no best yet", a failed write is logged and dropped.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Errors from a best score backend
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored best score is not a number: {0:?}")]
    Corrupt(String),
}

/// Durable storage for the best score
pub trait BestScoreStore {
    /// Stored best, 0 if nothing has been stored yet
    fn load_best(&self) -> Result<u64, PersistenceError>;

    fn save_best(&mut self, best: u64) -> Result<(), PersistenceError>;
}

/// Parse the stored representation; empty means nothing stored
pub fn parse_best(raw: &str) -> Result<u64, PersistenceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| PersistenceError::Corrupt(trimmed.to_string()))
}

/// In-memory store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(best)),
        }
    }

    pub fn value(&self) -> u64 {
        self.value.get()
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best(&self) -> Result<u64, PersistenceError> {
        Ok(self.value.get())
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistenceError> {
        self.value.set(best);
        Ok(())
    }
}

/// Boundary between the session and a store.
///
/// Caches the best score so it never goes down, even when the backend fails
/// or returns something smaller than what this process has already seen.
pub struct BestScoreKeeper {
    store: Box<dyn BestScoreStore>,
    best: u64,
}

impl BestScoreKeeper {
    pub fn new(store: Box<dyn BestScoreStore>) -> Self {
        let mut keeper = Self { store, best: 0 };
        keeper.reload();
        keeper
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Re-read the store (at session reset)
    pub fn reload(&mut self) -> u64 {
        match self.store.load_best() {
            Ok(stored) => self.best = self.best.max(stored),
            Err(e) => log::warn!("Could not load best score: {}", e),
        }
        self.best
    }

    /// Record a score; writes through immediately if it beats the best.
    /// Returns true if it was a new best.
    pub fn offer(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.save_best(score) {
            Ok(()) => log::debug!("Best score saved ({})", score),
            Err(e) => log::warn!("Could not save best score {}: {}", score, e),
        }
        true
    }
}
