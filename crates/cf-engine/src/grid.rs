//! 5×5 grid with gravity and weighted refill
//!
//! Row 0 is the top; gravity compacts symbols toward increasing row.
//! `Empty` cells exist only between a removal and the next refill.

use serde::{Deserialize, Serialize};

use crate::config::WeightTable;
use crate::rng::GameRng;
use crate::symbols::Symbol;

/// Grid side length (rows and columns)
pub const GRID_SIZE: usize = 5;

/// A `(row, col)` cell address, row-major ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    /// Flat row-major index in `[0, 25)`
    pub fn index(&self) -> usize {
        self.row as usize * GRID_SIZE + self.col as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    /// 4-connected neighbors inside the grid
    pub fn neighbors(&self) -> impl Iterator<Item = Position> {
        let (row, col) = (self.row as isize, self.col as isize);
        [(row - 1, col), (row + 1, col), (row, col - 1), (row, col + 1)]
            .into_iter()
            .filter_map(|(r, c)| {
                (r >= 0 && c >= 0 && (r as usize) < GRID_SIZE && (c as usize) < GRID_SIZE)
                    .then(|| Position::new(r as usize, c as usize))
            })
    }

    /// 3×3 area centered here, clipped to the grid (includes the center)
    pub fn area_3x3(&self) -> impl Iterator<Item = Position> {
        let (row, col) = (self.row as isize, self.col as isize);
        (row - 1..=row + 1).flat_map(move |r| {
            (col - 1..=col + 1).filter_map(move |c| {
                (r >= 0 && c >= 0 && (r as usize) < GRID_SIZE && (c as usize) < GRID_SIZE)
                    .then(|| Position::new(r as usize, c as usize))
            })
        })
    }
}

/// The 5×5 cell container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Symbol; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// All cells `Empty` — the state before a round's first drop
    pub fn empty() -> Self {
        Self {
            cells: [[Symbol::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build from rows, top row first (fixture helper)
    pub fn from_rows(rows: [[Symbol; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells: rows }
    }

    /// Every position in row-major order
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE * GRID_SIZE).map(Position::from_index)
    }

    pub fn symbol_at(&self, pos: Position) -> Symbol {
        self.cells[pos.row as usize][pos.col as usize]
    }

    pub fn set(&mut self, pos: Position, symbol: Symbol) {
        self.cells[pos.row as usize][pos.col as usize] = symbol;
    }

    /// Replace every `Empty` cell with a weighted draw
    ///
    /// Fill order is row-major (top-to-bottom, left-to-right); each draw is
    /// independent but the order fixes which draw lands in which cell.
    pub fn refill(&mut self, table: &WeightTable, rng: &mut GameRng) {
        self.fill_empty(|| table.draw(rng));
    }

    /// Fill every `Empty` cell from a supplier, in row-major order
    pub fn fill_empty(&mut self, mut supply: impl FnMut() -> Symbol) {
        for pos in Self::positions() {
            if self.symbol_at(pos).is_empty() {
                let symbol = supply();
                debug_assert!(!symbol.is_empty(), "refill must place a real symbol");
                self.set(pos, symbol);
            }
        }
    }

    /// Compact each column downward, preserving top-to-bottom order
    pub fn apply_gravity(&mut self) {
        for col in 0..GRID_SIZE {
            let mut stack = [Symbol::Empty; GRID_SIZE];
            let mut write = GRID_SIZE;
            for row in (0..GRID_SIZE).rev() {
                let symbol = self.cells[row][col];
                if !symbol.is_empty() {
                    write -= 1;
                    stack[write] = symbol;
                }
            }
            for row in 0..GRID_SIZE {
                self.cells[row][col] = stack[row];
            }
        }
    }

    /// Clear the listed cells to `Empty`
    pub fn remove(&mut self, positions: &[Position]) {
        for &pos in positions {
            self.set(pos, Symbol::Empty);
        }
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        Self::positions()
            .filter(|&p| self.symbol_at(p) == symbol)
            .count()
    }

    pub fn positions_of(&self, symbol: Symbol) -> Vec<Position> {
        Self::positions()
            .filter(|&p| self.symbol_at(p) == symbol)
            .collect()
    }

    pub fn cells_matching(&self, predicate: impl Fn(Symbol) -> bool) -> Vec<Position> {
        Self::positions()
            .filter(|&p| predicate(self.symbol_at(p)))
            .collect()
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions_of(Symbol::Empty)
    }

    pub fn is_full(&self) -> bool {
        Self::positions().all(|p| !self.symbol_at(p).is_empty())
    }
}
