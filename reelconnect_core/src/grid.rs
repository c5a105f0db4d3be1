use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::symbols::Symbol;

pub const REELS: usize = 5; // columns
pub const ROWS: usize = 3; // visible symbols per reel
pub const CELLS: usize = REELS * ROWS;

/// Read access to a 3x5 symbol grid.
///
/// Callers must stay inside `[0, ROWS) x [0, REELS)`. An absent symbol is a
/// valid answer and never matches anything.
pub trait GridAccess {
    fn symbol_at(&self, row: usize, col: usize) -> Option<Symbol>;
}

/// Linear index of a cell, row-major.
pub fn cell_index(row: usize, col: usize) -> usize {
    row * REELS + col
}

/// Inverse of [`cell_index`], returned as `(row, col)`.
pub fn cell_position(index: usize) -> (usize, usize) {
    (index / REELS, index % REELS)
}

/// Snapshot of the symbols showing on every reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Grid {
    cells: [[Option<Symbol>; REELS]; ROWS],
}

impl Grid {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a grid from rows of symbols, top row first.
    pub fn from_rows(rows: [[Symbol; REELS]; ROWS]) -> Self {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, sym) in row.iter().enumerate() {
                grid.cells[r][c] = Some(*sym);
            }
        }
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<Symbol>, CoreError> {
        if row >= ROWS || col >= REELS {
            return Err(CoreError::OutOfBounds { row, col });
        }
        Ok(self.cells[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, symbol: Option<Symbol>) -> Result<(), CoreError> {
        if row >= ROWS || col >= REELS {
            return Err(CoreError::OutOfBounds { row, col });
        }
        self.cells[row][col] = symbol;
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Symbol>; REELS]> {
        self.cells.iter()
    }

    /// Rows of asset keys; absent cells become `None`.
    pub fn to_keys(&self) -> Vec<Vec<Option<String>>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(|s| s.asset_key().to_string()))
                    .collect()
            })
            .collect()
    }

    pub fn snapshot<G: GridAccess + ?Sized>(source: &G) -> Self {
        let mut grid = Self::empty();
        for row in 0..ROWS {
            for col in 0..REELS {
                grid.cells[row][col] = source.symbol_at(row, col);
            }
        }
        grid
    }
}

impl GridAccess for Grid {
    fn symbol_at(&self, row: usize, col: usize) -> Option<Symbol> {
        self.cells[row][col]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(sym) => format!("{:>5}", sym.asset_key()),
                    None => format!("{:>5}", "-"),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
