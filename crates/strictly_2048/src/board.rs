//! Dense rectangular board storage.

use crate::types::{Cell, Direction, MAX_TILE, Position, TileId, is_valid_tile};
use rand::Rng;
use std::fmt;
use tracing::instrument;

/// A `rows x cols` grid of cells in row-major order.
///
/// Every in-range coordinate always holds exactly one cell. Accessing a
/// coordinate outside the grid is a programming error and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board whose every cell is empty with a fresh id.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[instrument(skip(rng))]
    pub fn initialize<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        assert!(rows > 0 && cols > 0, "board must be at least 1x1, got {rows}x{cols}");
        let cells = (0..rows * cols)
            .map(|_| Cell::empty(TileId::generate(rng)))
            .collect();
        Self { rows, cols, cells }
    }

    /// Builds a board from row slices of tile values, assigning fresh ids.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty, ragged, or holds a value that is neither
    /// zero nor a power of two, or that exceeds [`MAX_TILE`].
    pub fn from_values<R, V>(values: &[V], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        V: AsRef<[u32]>,
    {
        let rows = values.len();
        let cols = values.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut board = Self::initialize(rows, cols, rng);
        for (row, line) in values.iter().enumerate() {
            let line = line.as_ref();
            assert_eq!(line.len(), cols, "row {row} has {} cells, expected {cols}", line.len());
            for (col, &value) in line.iter().enumerate() {
                assert!(value <= MAX_TILE, "tile {value} exceeds maximum {MAX_TILE}");
                assert!(is_valid_tile(value), "tile {value} is not a power of two");
                if value != 0 {
                    board.set(Position::new(row, col), Cell::tile(value, TileId::generate(rng)));
                }
            }
        }
        board
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if `pos` lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position ({pos}) outside {}x{} board",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Returns the cell at `pos`.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Returns the tile value at `pos`.
    pub fn value(&self, pos: Position) -> u32 {
        self.get(pos).value()
    }

    /// Replaces the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.index(pos);
        self.cells[index] = cell;
    }

    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Position::new(i / cols, i % cols))
    }

    /// All cells paired with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Returns true if no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Sum of all tile values.
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.value())).sum()
    }

    /// Largest tile on the board, `0` if empty.
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().map(Cell::value).max().unwrap_or(0)
    }

    /// Compares tile values only, ignoring tile ids.
    pub fn same_values(&self, other: &Board) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.value() == b.value())
    }

    /// Tile values as nested rows.
    pub fn values(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(Cell::value).collect())
            .collect()
    }

    /// Lines of coordinates a swipe in `direction` processes, each ordered
    /// starting at the edge tiles travel toward.
    pub fn lines(&self, direction: Direction) -> Vec<Vec<Position>> {
        match direction {
            Direction::Up => (0..self.cols)
                .map(|col| (0..self.rows).map(|row| Position::new(row, col)).collect())
                .collect(),
            Direction::Down => (0..self.cols)
                .map(|col| (0..self.rows).rev().map(|row| Position::new(row, col)).collect())
                .collect(),
            Direction::Left => (0..self.rows)
                .map(|row| (0..self.cols).map(|col| Position::new(row, col)).collect())
                .collect(),
            Direction::Right => (0..self.rows)
                .map(|row| (0..self.cols).rev().map(|col| Position::new(row, col)).collect())
                .collect(),
        }
    }
}

impl fmt::Display for Board {
    /// Space-separated values, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.values().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line = row
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
