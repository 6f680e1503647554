//! Slide-and-merge for a single line of cells.

use crate::types::{Cell, MAX_TILE};

/// Result of collapsing one line toward its leading edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collapsed {
    tiles: Vec<Cell>,
    merged: Vec<usize>,
    gained: u64,
}

impl Collapsed {
    /// Surviving tiles packed against the edge, nearest first.
    pub fn tiles(&self) -> &[Cell] {
        &self.tiles
    }

    /// Slots (indices into [`Self::tiles`]) that hold a merge result.
    pub fn merged(&self) -> &[usize] {
        &self.merged
    }

    /// Sum of all merge results in the line.
    pub fn gained(&self) -> u64 {
        self.gained
    }
}

/// Value produced by merging tiles `a` and `b`, if they can merge.
///
/// Only equal non-zero tiles merge, and never into a value above
/// [`MAX_TILE`].
pub fn merge_result(a: u32, b: u32) -> Option<u32> {
    if a == 0 || a != b {
        return None;
    }
    a.checked_add(b).filter(|&sum| sum <= MAX_TILE)
}

/// Slides the non-empty cells of `line` toward index 0 and merges equal
/// neighbours.
///
/// `line[0]` is the cell at the edge tiles travel toward. Merging walks away
/// from the edge: a tile equal to its edge-ward neighbour merges into it, the
/// merged tile keeps the id of the tile that moved, and tiles behind close
/// the gap. A merge result never merges again in the same call.
pub fn collapse_line(line: &[Cell]) -> Collapsed {
    let mut out = Collapsed::default();
    let mut last_is_merge = false;

    for cell in line.iter().filter(|cell| !cell.is_empty()) {
        let merged = match out.tiles.last() {
            Some(prev) if !last_is_merge => merge_result(prev.value(), cell.value()),
            _ => None,
        };
        match merged {
            Some(sum) => {
                let slot = out.tiles.len() - 1;
                out.tiles[slot] = Cell::tile(sum, cell.id());
                out.merged.push(slot);
                out.gained += u64::from(sum);
                last_is_merge = true;
            }
            None => {
                out.tiles.push(*cell);
                last_is_merge = false;
            }
        }
    }

    out
}
