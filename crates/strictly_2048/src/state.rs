//! Game state and its transitions.
//!
//! Every transition borrows the current state and returns a new one, so a
//! caller can keep earlier states around for undo or replay.

use crate::board::Board;
use crate::invariants::assert_invariants;
use crate::rules::{collapse_line, has_lost};
use crate::types::{Cell, Direction, Position, TileId};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

#[cfg(debug_assertions)]
use crate::contracts::{Contract, SwipeContract};

/// Probability denominator for spawning a 4 instead of a 2.
const FOUR_ODDS: u32 = 10;

/// Coarse lifecycle of a game as the engine sees it.
///
/// Winning is decided by the host against its own threshold and never
/// appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Moves are still possible.
    Idle,
    /// The board is full and nothing can merge.
    Lost,
}

/// Complete observable state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    score: u64,
    best_score: u64,
    added_score: u64,
    merged_positions: BTreeSet<Position>,
    new_spawn_positions: BTreeSet<Position>,
    has_lost: bool,
}

impl GameState {
    /// Creates a state with an empty `rows x cols` board and no tiles.
    ///
    /// Call [`GameState::start_game`] to place the opening tiles.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self::with_board(Board::initialize(rows, cols, rng), 0, 0)
    }

    /// Creates a state around an existing board.
    ///
    /// Markers start empty and the loss flag is derived from the board.
    pub fn with_board(board: Board, score: u64, best_score: u64) -> Self {
        let has_lost = has_lost(&board);
        Self {
            board,
            score,
            best_score,
            added_score: 0,
            merged_positions: BTreeSet::new(),
            new_spawn_positions: BTreeSet::new(),
            has_lost,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    /// Current score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest score seen, refreshed whenever tiles spawn.
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Score gained by the most recent move that changed the board.
    pub fn added_score(&self) -> u64 {
        self.added_score
    }

    /// Merge targets of the most recent move.
    pub fn merged_positions(&self) -> &BTreeSet<Position> {
        &self.merged_positions
    }

    /// Cells filled by the most recent spawn or restore.
    pub fn new_spawn_positions(&self) -> &BTreeSet<Position> {
        &self.new_spawn_positions
    }

    /// True once the board is full with no possible merge.
    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.has_lost { Phase::Lost } else { Phase::Idle }
    }

    /// Clears the board, resets the score and spawns two tiles.
    ///
    /// The best score and the board dimensions carry over.
    #[instrument(skip(self, rng), fields(best_score = self.best_score))]
    pub fn start_game<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        info!(rows = self.rows(), cols = self.cols(), "Starting new game");
        let fresh = Self::with_board(
            Board::initialize(self.rows(), self.cols(), rng),
            0,
            self.best_score,
        );
        fresh.spawn(2, rng)
    }

    /// Slides and merges every tile toward the `direction` edge.
    ///
    /// When no tile can move the same state comes back unchanged. If the
    /// board changed and `spawn` is set, one new tile is spawned afterwards.
    #[instrument(skip(self, rng), fields(score = self.score))]
    pub fn swipe<R: Rng + ?Sized>(&self, direction: Direction, spawn: bool, rng: &mut R) -> Self {
        let mut board = self.board.clone();
        let mut merged_positions = BTreeSet::new();
        let mut gained = 0;

        for line in self.board.lines(direction) {
            let cells: Vec<Cell> = line.iter().map(|&pos| self.board.get(pos)).collect();
            let collapsed = collapse_line(&cells);
            for (slot, &pos) in line.iter().enumerate() {
                match collapsed.tiles().get(slot) {
                    Some(&tile) => board.set(pos, tile),
                    // Slot was already empty and keeps its own id.
                    None if cells[slot].is_empty() => {}
                    None => board.set(pos, Cell::empty(TileId::generate(rng))),
                }
            }
            merged_positions.extend(collapsed.merged().iter().map(|&slot| line[slot]));
            gained += collapsed.gained();
        }

        if board.same_values(&self.board) {
            debug!(%direction, "Swipe moved nothing");
            return self.clone();
        }

        let next = Self {
            has_lost: has_lost(&board),
            board,
            score: self.score + gained,
            best_score: self.best_score,
            added_score: gained,
            merged_positions,
            new_spawn_positions: BTreeSet::new(),
        };

        #[cfg(debug_assertions)]
        if let Err(violation) = SwipeContract::post(self, &next) {
            panic!("{violation}");
        }

        debug!(
            %direction,
            gained,
            merges = next.merged_positions.len(),
            "Swipe applied"
        );

        let next = if spawn { next.spawn(1, rng) } else { next };
        assert_invariants(&next);
        next
    }

    /// Places up to `count` new tiles on random empty cells.
    ///
    /// Each tile is a 2 with probability 9/10, otherwise a 4. Spawning stops
    /// early once the board is full. The best score is refreshed here.
    #[instrument(skip(self, rng))]
    pub fn spawn<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Self {
        let mut next = self.clone();
        next.new_spawn_positions.clear();

        for _ in 0..count {
            let empty = next.board.empty_positions();
            if empty.is_empty() {
                debug!("Board full, stopping spawn early");
                break;
            }
            let pos = empty[rng.random_range(0..empty.len())];
            let value = if rng.random_ratio(1, FOUR_ODDS) { 4 } else { 2 };
            next.board.set(pos, Cell::tile(value, TileId::generate(rng)));
            next.new_spawn_positions.insert(pos);
            debug!(%pos, value, "Spawned tile");
        }

        next.best_score = next.best_score.max(next.score);
        next.has_lost = has_lost(&next.board);
        debug_assert!(next.best_score >= next.score, "best score trails score");
        assert_invariants(&next);
        next
    }

    /// Adopts an externally supplied board and score, e.g. a restored save.
    ///
    /// Cells that hold a tile in `board` but were empty, or did not exist, in
    /// the current board are reported as newly spawned so a front end can
    /// animate them in.
    #[instrument(skip(self, board), fields(rows = board.rows(), cols = board.cols()))]
    pub fn load_from_external_data(&self, board: Board, score: u64, best_score: u64) -> Self {
        let new_spawn_positions = board
            .cells()
            .filter(|(pos, cell)| {
                !cell.is_empty() && (!self.board.contains(*pos) || self.board.value(*pos) == 0)
            })
            .map(|(pos, _)| pos)
            .collect();

        let mut next = Self::with_board(board, score, best_score.max(score));
        next.new_spawn_positions = new_spawn_positions;
        info!(score, best_score = next.best_score, "Loaded external game data");
        assert_invariants(&next);
        next
    }

    #[cfg(test)]
    pub(crate) fn with_forged_flag(mut self, has_lost: bool) -> Self {
        self.has_lost = has_lost;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_forged_markers(mut self, merged: &[Position], spawned: &[Position]) -> Self {
        self.merged_positions = merged.iter().copied().collect();
        self.new_spawn_positions = spawned.iter().copied().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2048)
    }

    fn state(values: &[[u32; 3]], score: u64) -> GameState {
        GameState::with_board(Board::from_values(values, &mut rng()), score, score)
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = GameState::new(4, 4, &mut rng());
        assert_eq!(state.board().empty_positions().len(), 16);
        assert_eq!(state.score(), 0);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_game_spawns_two_and_keeps_best() {
        let mut rng = rng();
        let old = GameState::with_board(Board::initialize(4, 4, &mut rng), 300, 500);
        let started = old.start_game(&mut rng);
        assert_eq!(started.score(), 0);
        assert_eq!(started.best_score(), 500);
        assert_eq!(started.new_spawn_positions().len(), 2);
        assert_eq!(16 - started.board().empty_positions().len(), 2);
    }

    #[test]
    fn test_swipe_without_spawn_sets_markers() {
        let before = state(&[[2, 0, 0], [2, 0, 0], [0, 0, 0]], 0);
        let after = before.swipe(Direction::Up, false, &mut rng());
        assert_eq!(after.board().values(), [[4, 0, 0], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(after.score(), 4);
        assert_eq!(after.added_score(), 4);
        assert!(after.merged_positions().contains(&Position::new(0, 0)));
        assert!(after.new_spawn_positions().is_empty());
    }

    #[test]
    fn test_noop_swipe_returns_same_state() {
        let before = state(&[[2, 4, 0], [0, 0, 0], [0, 0, 0]], 12);
        let after = before.swipe(Direction::Up, true, &mut rng());
        assert_eq!(after, before);
    }

    #[test]
    fn test_swipe_with_spawn_adds_one_tile() {
        let before = state(&[[0, 0, 2], [0, 0, 0], [0, 0, 0]], 0);
        let after = before.swipe(Direction::Left, true, &mut rng());
        assert_eq!(after.board().value(Position::new(0, 0)), 2);
        assert_eq!(after.new_spawn_positions().len(), 1);
        assert_eq!(after.board().empty_positions().len(), 7);
    }

    #[test]
    fn test_spawn_refreshes_best_score() {
        let before = GameState::with_board(Board::initialize(2, 2, &mut rng()), 64, 32);
        let after = before.spawn(1, &mut rng());
        assert_eq!(after.best_score(), 64);
    }

    #[test]
    fn test_spawn_on_full_board_stops_early() {
        let before = state(&[[2, 4, 2], [4, 2, 4], [2, 4, 2]], 0);
        let after = before.spawn(3, &mut rng());
        assert!(after.board().same_values(before.board()));
        assert!(after.new_spawn_positions().is_empty());
    }

    #[test]
    fn test_load_marks_new_tiles_as_spawned() {
        let mut rng = rng();
        let current = GameState::with_board(
            Board::from_values(&[[2, 0], [0, 0]], &mut rng),
            0,
            0,
        );
        let restored = Board::from_values(&[[2, 4], [0, 8]], &mut rng);
        let loaded = current.load_from_external_data(restored, 100, 50);
        assert_eq!(loaded.score(), 100);
        assert_eq!(loaded.best_score(), 100);
        let spawned: Vec<_> = loaded.new_spawn_positions().iter().copied().collect();
        assert_eq!(spawned, [Position::new(0, 1), Position::new(1, 1)]);
    }

    #[test]
    fn test_load_larger_board_counts_absent_cells() {
        let mut rng = rng();
        let current = GameState::new(1, 1, &mut rng);
        let restored = Board::from_values(&[[0, 2], [4, 0]], &mut rng);
        let loaded = current.load_from_external_data(restored, 0, 0);
        assert_eq!(loaded.rows(), 2);
        assert_eq!(loaded.new_spawn_positions().len(), 2);
    }
}
