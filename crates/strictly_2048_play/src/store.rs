//! JSON save file for an in-progress game.

use derive_more::{Display, Error};
use rand::Rng;
use std::path::{Path, PathBuf};
use strictly_2048::{GameEvent, GameState, SavedGame};
use tracing::{debug, info, instrument};

/// Reads and writes one [`SavedGame`] at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// Creates a store backed by `path`. Nothing is touched until a read or
    /// write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The save file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved game, or `None` if no save exists yet.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<SavedGame>, StoreError> {
        if !self.path.exists() {
            debug!("No save file");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::new(format!("Failed to read save file: {}", e)))?;
        let saved: SavedGame = serde_json::from_str(&content)
            .map_err(|e| StoreError::new(format!("Failed to parse save file: {}", e)))?;
        debug!(score = saved.score, tiles = saved.board.len(), "Save file read");
        Ok(Some(saved))
    }

    /// Overwrites the save file with `saved`.
    #[instrument(skip(self, saved), fields(path = %self.path.display(), score = saved.score))]
    pub fn save(&self, saved: &SavedGame) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(saved)
            .map_err(|e| StoreError::new(format!("Failed to encode game: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::new(format!("Failed to write save file: {}", e)))?;
        info!("Game saved");
        Ok(())
    }

    /// Loads the save into a fresh `rows x cols` game.
    pub fn load_state<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Option<GameState>, StoreError> {
        let Some(saved) = self.load()? else {
            return Ok(None);
        };
        let state = GameState::new(rows, cols, rng)
            .update(&GameEvent::RestoreFromPersisted(saved), rng)
            .map_err(|e| StoreError::new(format!("Save file holds an invalid game: {}", e.kind)))?;
        Ok(Some(state))
    }
}

/// Save file error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
