//! The seam between game logic and whatever draws the reels.

use std::collections::HashSet;

use crate::evaluator::Evaluation;
use crate::grid::{cell_position, Grid, GridAccess, REELS, ROWS};
use crate::symbols::{asset_catalog, DisplaySymbol, Symbol};

/// Rendering collaborator driven by a spin session.
///
/// `symbol_at` (from [`GridAccess`]) reports the base symbol a cell shows,
/// whichever form it is drawn in.
pub trait ReelView: GridAccess {
    fn set_symbol(&mut self, row: usize, col: usize, display: DisplaySymbol);

    /// Whether artwork for this asset key is loaded.
    fn has_asset(&self, key: &str) -> bool;

    fn show_win_amount(&mut self, amount: u64);
}

/// Headless view that keeps cell state in memory.
#[derive(Debug, Clone)]
pub struct MemoryReelView {
    cells: [[Option<DisplaySymbol>; REELS]; ROWS],
    assets: HashSet<String>,
    win_amount: u64,
}

impl Default for MemoryReelView {
    fn default() -> Self {
        Self::with_assets(asset_catalog())
    }
}

impl MemoryReelView {
    pub fn with_assets(assets: impl IntoIterator<Item = String>) -> Self {
        Self {
            cells: [[None; REELS]; ROWS],
            assets: assets.into_iter().collect(),
            win_amount: 0,
        }
    }

    /// Land a freshly rolled grid, every cell in its base form.
    pub fn show_grid(&mut self, grid: &Grid) {
        for row in 0..ROWS {
            for col in 0..REELS {
                self.cells[row][col] = grid.symbol_at(row, col).map(DisplaySymbol::from);
            }
        }
    }

    pub fn display_at(&self, row: usize, col: usize) -> Option<DisplaySymbol> {
        self.cells[row][col]
    }

    pub fn win_amount(&self) -> u64 {
        self.win_amount
    }

    pub fn display_keys(&self) -> Vec<Vec<Option<String>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|d| d.map(|d| d.asset_key())).collect())
            .collect()
    }

    pub fn connected_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|d| d.is_some_and(|d| d.is_connected()))
            .count()
    }
}

impl GridAccess for MemoryReelView {
    fn symbol_at(&self, row: usize, col: usize) -> Option<Symbol> {
        self.cells[row][col].map(|d| d.symbol)
    }
}

impl ReelView for MemoryReelView {
    fn set_symbol(&mut self, row: usize, col: usize, display: DisplaySymbol) {
        self.cells[row][col] = Some(display);
    }

    fn has_asset(&self, key: &str) -> bool {
        self.assets.contains(key)
    }

    fn show_win_amount(&mut self, amount: u64) {
        self.win_amount = amount;
    }
}

/// Switch every matched cell to its connected artwork.
///
/// Best effort: cells whose symbol has no connected form, or whose connected
/// asset is not loaded, keep their base artwork. Returns how many cells were
/// switched.
pub fn apply_connected<V: ReelView + ?Sized>(view: &mut V, evaluation: &Evaluation) -> usize {
    let mut switched = 0;
    for index in evaluation.matched_cells() {
        let (row, col) = cell_position(index);
        let Some(symbol) = view.symbol_at(row, col) else {
            continue;
        };
        let Some(connected) = symbol.connected_form() else {
            tracing::debug!("no connected form for {symbol} at cell {index}");
            continue;
        };
        let key = connected.asset_key();
        if !view.has_asset(&key) {
            tracing::debug!("asset {key} missing, keeping base artwork at cell {index}");
            continue;
        }
        view.set_symbol(row, col, connected);
        switched += 1;
    }
    switched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::symbols::Symbol::*;

    fn landed(rows: [[Symbol; REELS]; ROWS]) -> MemoryReelView {
        let mut view = MemoryReelView::default();
        view.show_grid(&Grid::from_rows(rows));
        view
    }

    #[test]
    fn test_matched_cells_switch_to_connected() {
        let mut view = landed([
            [A, A, A, K, K],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        let eval = evaluate(&view);
        assert_eq!(apply_connected(&mut view, &eval), 3);
        assert_eq!(view.display_at(0, 0).unwrap().asset_key(), "A_connect");
        assert_eq!(view.display_at(0, 3).unwrap().asset_key(), "K");
        // still reads as base symbols
        assert_eq!(evaluate(&view), eval);
    }

    #[test]
    fn test_bonus_is_left_alone() {
        let mut view = landed([
            [Bonus, Bonus, Bonus, K, K],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        let eval = evaluate(&view);
        assert_eq!(eval.win_amount, 30);
        assert_eq!(apply_connected(&mut view, &eval), 0);
        assert_eq!(view.connected_cells(), 0);
    }

    #[test]
    fn test_missing_asset_skips_swap() {
        let mut view = MemoryReelView::with_assets(vec!["Q".to_string()]);
        view.show_grid(&Grid::from_rows([
            [Q, Q, Q, Q, K],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]));
        let eval = evaluate(&view);
        assert_eq!(apply_connected(&mut view, &eval), 0);
        assert_eq!(view.display_keys()[0][0].as_deref(), Some("Q"));
    }
}
