//! Browser best score storage (LocalStorage)

use super::{BestScoreStore, PersistenceError, parse_best};
use crate::consts::BEST_SCORE_KEY;

/// Stores the best score under `snake_best_v1` in LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load_best(&self) -> Result<u64, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => parse_best(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(PersistenceError::Unavailable),
        }
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(BEST_SCORE_KEY, &best.to_string())
            .map_err(|_| PersistenceError::Unavailable)
    }
}
