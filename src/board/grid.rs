//! The rectangular board.
//!
//! ## Storage
//!
//! Cells are kept row-major in an `im::Vector`, so cloning a board shares
//! structure and costs O(1). The engine relies on this twice: snapshots
//! hand the presentation layer a board clone, and a move's cascade runs on
//! a scratch clone that is only committed once it has drained.
//!
//! ## Mutation
//!
//! The board has no game behaviour. The crate-private `set` is the single
//! write path; the turn manager writes placements and the cascade processor
//! writes explosions. Callers outside the crate build prepared positions
//! with [`Board::from_cells`], which checks the layout.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Cell, Position};
use crate::core::{BoardError, MoveError, PlayerId, PlayerMap};

/// Fixed-size grid of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    rows: usize,
    cols: usize,
    capacity: u32,
    cells: Vector<Cell>,
}

/// Wire form of a board before the layout is checked.
#[derive(Deserialize)]
struct RawBoard {
    rows: usize,
    cols: usize,
    capacity: u32,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_cells(raw.rows, raw.cols, raw.capacity, raw.cells)
    }
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(rows: usize, cols: usize, capacity: u32) -> Self {
        Self {
            rows,
            cols,
            capacity,
            cells: std::iter::repeat(Cell::EMPTY).take(rows * cols).collect(),
        }
    }

    /// Build a board from row-major cells.
    ///
    /// ```
    /// use chain_reaction::board::{Board, Cell, Position};
    /// use chain_reaction::core::PlayerId;
    ///
    /// let mut cells = vec![Cell::EMPTY; 4];
    /// cells[3] = Cell::owned(PlayerId(1), 2);
    /// let board = Board::from_cells(2, 2, 4, cells).unwrap();
    /// assert_eq!(board.get(Position::new(1, 1)).unwrap().power(), 2);
    ///
    /// assert!(Board::from_cells(2, 2, 4, vec![Cell::EMPTY; 3]).is_err());
    /// ```
    pub fn from_cells(
        rows: usize,
        cols: usize,
        capacity: u32,
        cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyBoard { rows, cols });
        }
        let cells: Vector<Cell> = cells.into_iter().collect();
        let expected = rows * cols;
        if cells.len() != expected {
            return Err(BoardError::CellCount {
                rows,
                cols,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            capacity,
            cells,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> Result<usize, MoveError> {
        if self.contains(pos) {
            Ok(pos.row * self.cols + pos.col)
        } else {
            Err(MoveError::OutOfBounds {
                position: pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Read a cell.
    pub fn get(&self, pos: Position) -> Result<Cell, MoveError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx])
    }

    /// Overwrite a cell.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) -> Result<(), MoveError> {
        let idx = self.index(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Mutable access for in-crate writers that already checked bounds.
    pub(crate) fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, MoveError> {
        let idx = self.index(pos)?;
        Ok(&mut self.cells[idx])
    }

    /// Explosion threshold of a cell.
    ///
    /// Uniform today; taking the position keeps per-cell thresholds a local
    /// change.
    #[must_use]
    pub fn capacity(&self, _pos: Position) -> u32 {
        self.capacity
    }

    /// Whether a cell has reached its explosion threshold.
    #[must_use]
    pub fn is_overloaded(&self, pos: Position) -> bool {
        self.get(pos)
            .map(|cell| cell.power() >= self.capacity(pos))
            .unwrap_or(false)
    }

    /// Orthogonal neighbours that exist, in up, down, left, right order.
    ///
    /// Corners yield 2, edges 3, interior cells 4.
    #[must_use]
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 4]> {
        let mut out = SmallVec::new();
        if !self.contains(pos) {
            return out;
        }
        if pos.row > 0 {
            out.push(Position::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.rows {
            out.push(Position::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            out.push(Position::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            out.push(Position::new(pos.row, pos.col + 1));
        }
        out
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |i| Position::new(i / cols, i % cols))
    }

    /// (Position, Cell) pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Cells owned by `player`, row-major.
    #[must_use]
    pub fn owned_cells(&self, player: PlayerId) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.is_owned_by(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    #[must_use]
    pub fn owned_count(&self, player: PlayerId) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(player)).count()
    }

    /// Sum of power across the board.
    #[must_use]
    pub fn total_power(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.power())).sum()
    }

    /// Sum of power held by `player`.
    #[must_use]
    pub fn power_of(&self, player: PlayerId) -> u64 {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(player))
            .map(|c| u64::from(c.power()))
            .sum()
    }

    /// Owned-cell count for every seat in one pass.
    #[must_use]
    pub fn cell_counts(&self, player_count: usize) -> PlayerMap<usize> {
        let mut counts = PlayerMap::with_value(player_count, 0usize);
        for cell in self.cells.iter() {
            if let Some(owner) = cell.owner() {
                if counts.contains(owner) {
                    counts[owner] += 1;
                }
            }
        }
        counts
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| format!("{:>3}", self.cells[row * self.cols + col].to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
