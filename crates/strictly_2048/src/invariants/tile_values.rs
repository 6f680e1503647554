//! Tile value invariant: every occupied cell holds a power of two no larger
//! than the maximum tile.

use super::Invariant;
use crate::state::GameState;
use crate::types::is_valid_tile;

/// Invariant: tiles are zero or a power of two.
///
/// Merges double a value and spawns place 2 or 4, so nothing else can appear.
pub struct PowerOfTwoTilesInvariant;

impl Invariant<GameState> for PowerOfTwoTilesInvariant {
    fn holds(state: &GameState) -> bool {
        state
            .board()
            .cells()
            .all(|(_, cell)| is_valid_tile(cell.value()))
    }

    fn description() -> &'static str {
        "Tiles are empty or a power of two within the maximum"
    }
}
