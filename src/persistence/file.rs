//! Native best score storage in a small text file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BestScoreStore, PersistenceError, parse_best};
use crate::consts::BEST_SCORE_KEY;

/// Stores the best score as a decimal string in a file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/snake_best_v1`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(BEST_SCORE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for FileStore {
    fn load_best(&self) -> Result<u64, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_best(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save_best(&mut self, best: u64) -> Result<(), PersistenceError> {
        // Write to a sibling and rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, best.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
