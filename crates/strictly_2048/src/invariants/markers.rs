//! Marker invariant: merge and spawn markers point at live tiles.

use super::Invariant;
use crate::state::GameState;

/// Invariant: every merged or spawned coordinate lies on the board and holds
/// a tile.
///
/// Spawning never overwrites a tile, so a merge target stays occupied after
/// the spawn that follows it.
pub struct MarkersOnTilesInvariant;

impl Invariant<GameState> for MarkersOnTilesInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();
        state
            .merged_positions()
            .iter()
            .chain(state.new_spawn_positions())
            .all(|&pos| board.contains(pos) && !board.get(pos).is_empty())
    }

    fn description() -> &'static str {
        "Merge and spawn markers point at tiles"
    }
}
