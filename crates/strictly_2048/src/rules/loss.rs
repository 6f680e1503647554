//! Loss detection.

use super::slide::merge_result;
use crate::board::Board;
use crate::types::Position;
use tracing::instrument;

/// Returns true when the board is full and no two orthogonally adjacent
/// cells can merge.
///
/// Each pair is examined once through its right and lower neighbour.
#[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
pub fn has_lost(board: &Board) -> bool {
    if !board.is_full() {
        return false;
    }
    !board.positions().any(|pos| {
        let value = board.value(pos);
        let right = Position::new(pos.row, pos.col + 1);
        let below = Position::new(pos.row + 1, pos.col);
        [right, below]
            .into_iter()
            .any(|neighbor| {
                board.contains(neighbor) && merge_result(value, board.value(neighbor)).is_some()
            })
    })
}
