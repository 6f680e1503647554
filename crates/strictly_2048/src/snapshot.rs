//! Persisted game shape.
//!
//! Saved games store the board as a map from `"row, col"` keys to tile
//! values, next to the score and best score. Tile ids are not persisted;
//! restored tiles receive fresh ones.

use crate::board::Board;
use crate::state::GameState;
use crate::types::{Cell, MAX_TILE, Position, TileId, is_valid_tile};
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{instrument, warn};

/// A game as written to and read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct SavedGame {
    /// Tile values keyed by `"row, col"`.
    pub board: BTreeMap<String, u32>,
    /// Score at save time.
    pub score: u64,
    /// Best score at save time.
    pub best_score: u64,
}

impl SavedGame {
    /// Captures every cell of `state`, empty ones included.
    #[instrument(skip(state), fields(score = state.score()))]
    pub fn from_state(state: &GameState) -> Self {
        let board = state
            .board()
            .cells()
            .map(|(pos, cell)| (pos.to_string(), cell.value()))
            .collect();
        Self::new(board, state.score(), state.best_score())
    }

    /// Rebuilds a `rows x cols` board from the saved values.
    ///
    /// Coordinates absent from the map become empty cells.
    ///
    /// # Errors
    ///
    /// Returns an error for keys that do not parse as `"row, col"`, for
    /// coordinates outside the board, and for values that are not a power
    /// of two or exceed [`MAX_TILE`].
    #[instrument(skip(self, rng), fields(entries = self.board.len()))]
    pub fn to_board<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Board, SnapshotError> {
        let mut board = Board::initialize(rows, cols, rng);
        for (key, &value) in &self.board {
            let position = parse_key(key)?;
            if !board.contains(position) {
                warn!(%position, rows, cols, "Saved tile outside board");
                return Err(SnapshotError::new(SnapshotErrorKind::OutOfBounds {
                    position,
                    rows,
                    cols,
                }));
            }
            if value > MAX_TILE {
                warn!(%position, value, "Saved tile exceeds maximum");
                return Err(SnapshotError::new(SnapshotErrorKind::TileTooLarge {
                    position,
                    value,
                }));
            }
            if !is_valid_tile(value) {
                warn!(%position, value, "Saved tile is not a power of two");
                return Err(SnapshotError::new(SnapshotErrorKind::InvalidTile {
                    position,
                    value,
                }));
            }
            if value != 0 {
                board.set(position, Cell::tile(value, TileId::generate(rng)));
            }
        }
        Ok(board)
    }
}

/// Parses a `"row, col"` key.
///
/// # Errors
///
/// Returns [`SnapshotErrorKind::MalformedKey`] when the key is not two
/// comma-separated unsigned integers.
pub fn parse_key(key: &str) -> Result<Position, SnapshotError> {
    let malformed = || SnapshotError::new(SnapshotErrorKind::MalformedKey(key.to_string()));
    let (row, col) = key.split_once(',').ok_or_else(malformed)?;
    let row = row.trim().parse().map_err(|_| malformed())?;
    let col = col.trim().parse().map_err(|_| malformed())?;
    Ok(Position::new(row, col))
}

/// What went wrong while rehydrating a saved game.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SnapshotErrorKind {
    /// Key is not of the form `"row, col"`.
    #[display("malformed board key {_0:?}")]
    MalformedKey(String),
    /// Coordinate does not fit the board.
    #[display("position ({position}) outside {rows}x{cols} board")]
    OutOfBounds {
        /// Offending coordinate.
        position: Position,
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
    },
    /// Value is neither zero nor a power of two.
    #[display("tile {value} at ({position}) is not a power of two")]
    InvalidTile {
        /// Offending coordinate.
        position: Position,
        /// Offending value.
        value: u32,
    },
    /// Value is larger than the biggest tile the engine can merge safely.
    #[display("tile {value} at ({position}) exceeds maximum {}", MAX_TILE)]
    TileTooLarge {
        /// Offending coordinate.
        position: Position,
        /// Offending value.
        value: u32,
    },
}

/// Saved game error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", kind, file, line)]
pub struct SnapshotError {
    /// What went wrong.
    pub kind: SnapshotErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SnapshotErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
