//! Core domain types for the 2048 board.

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a physical tile.
///
/// Generated when a tile is spawned and carried verbatim through slides and
/// merges, so a front end can follow one tile across moves. Ids are drawn from
/// the caller's RNG, which keeps seeded games fully reproducible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub struct TileId(Uuid);

impl TileId {
    /// Draws a fresh identifier from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.random()).into_uuid())
    }
}

/// A single board slot.
///
/// A value of `0` marks an empty slot; any other value is a power of two up
/// to [`MAX_TILE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    value: u32,
    id: TileId,
}

impl Cell {
    /// Creates an empty cell.
    pub fn empty(id: TileId) -> Self {
        Self { value: 0, id }
    }

    /// Creates a cell holding a tile.
    pub fn tile(value: u32, id: TileId) -> Self {
        Self { value, id }
    }

    /// Tile value, `0` when empty.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Tile identity.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Returns true if no tile occupies this cell.
    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// A coordinate on the board, 0-indexed from the top-left corner.
///
/// Displays as `"row, col"`, the key format used by saved games.
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
    derive_new::new,
)]
#[display("{row}, {col}")]
pub struct Position {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

/// Swipe direction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Direction {
    /// Tiles travel toward row 0.
    Up,
    /// Tiles travel toward the last row.
    Down,
    /// Tiles travel toward column 0.
    Left,
    /// Tiles travel toward the last column.
    Right,
}

/// Largest tile the engine stores. Two of these never merge, so every merge
/// result fits in a `u32`.
pub const MAX_TILE: u32 = 1 << 30;

/// Returns true for `0` or a power of two no larger than [`MAX_TILE`].
pub fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value.is_power_of_two() && value <= MAX_TILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_position_displays_as_save_key() {
        assert_eq!(Position::new(2, 3).to_string(), "2, 3");
    }

    #[test]
    fn test_tile_ids_reproducible_under_seed() {
        let a = TileId::generate(&mut StdRng::seed_from_u64(7));
        let b = TileId::generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tile_ids_differ_within_stream() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_ne!(TileId::generate(&mut rng), TileId::generate(&mut rng));
    }

    #[test]
    fn test_valid_tiles() {
        assert!(is_valid_tile(0));
        assert!(is_valid_tile(2));
        assert!(is_valid_tile(2048));
        assert!(!is_valid_tile(3));
        assert!(!is_valid_tile(6));
        assert!(is_valid_tile(MAX_TILE));
        assert!(!is_valid_tile(MAX_TILE << 1));
    }
}
