//! Horizontal run detection on the 3x5 grid.

use serde::{Deserialize, Serialize};

use crate::grid::{cell_index, GridAccess, REELS, ROWS};
use crate::payout::total_win;
use crate::symbols::Symbol;

/// Shortest run that pays.
pub const MIN_RUN: usize = 3;

/// A winning horizontal run.
///
/// `indices` are linear cell indices (`row * 5 + col`) of contiguous columns
/// in one row, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub symbol: Symbol,
    pub count: usize,
    pub indices: Vec<usize>,
}

/// Matches found on a grid plus what they pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Evaluation {
    pub matches: Vec<Match>,
    pub win_amount: u64,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Every matched cell index, in match order.
    pub fn matched_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().flat_map(|m| m.indices.iter().copied())
    }
}

/// Scan each row left to right and collect runs of at least [`MIN_RUN`].
///
/// Runs never overlap: after reading a run the scan jumps past it, so a cell
/// belongs to at most one match.
pub fn find_matches<G: GridAccess + ?Sized>(grid: &G) -> Vec<Match> {
    let mut matches = Vec::new();
    for row in 0..ROWS {
        let mut col = 0;
        while col < REELS {
            let Some(symbol) = grid.symbol_at(row, col) else {
                col += 1;
                continue;
            };
            let mut indices = vec![cell_index(row, col)];
            for next in col + 1..REELS {
                if grid.symbol_at(row, next) != Some(symbol) {
                    break;
                }
                indices.push(cell_index(row, next));
            }
            let count = indices.len();
            if count >= MIN_RUN {
                matches.push(Match {
                    symbol,
                    count,
                    indices,
                });
            }
            col += count;
        }
    }
    matches
}

pub fn evaluate<G: GridAccess + ?Sized>(grid: &G) -> Evaluation {
    let matches = find_matches(grid);
    let win_amount = total_win(&matches);
    Evaluation {
        matches,
        win_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::symbols::Symbol::*;

    fn grid(rows: [[Symbol; REELS]; ROWS]) -> Grid {
        Grid::from_rows(rows)
    }

    #[test]
    fn test_distinct_rows_have_no_matches() {
        let g = grid([
            [Nine, Ten, A, J, K],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, Q],
        ]);
        assert!(find_matches(&g).is_empty());
        assert_eq!(evaluate(&g).win_amount, 0);
    }

    #[test]
    fn test_three_then_pair() {
        let g = grid([
            [Nine, Ten, A, J, K],
            [A, A, A, K, K],
            [M1, M2, M3, M4, Q],
        ]);
        let matches = find_matches(&g);
        assert_eq!(
            matches,
            vec![Match {
                symbol: A,
                count: 3,
                indices: vec![5, 6, 7],
            }]
        );
    }

    #[test]
    fn test_full_row_is_single_match() {
        let g = grid([
            [Q, Q, Q, Q, Q],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        let matches = find_matches(&g);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].count, 5);
        assert_eq!(matches[0].indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_run_at_row_end() {
        let g = grid([
            [J, K, M6, M6, M6],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        let matches = find_matches(&g);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].symbol, M6);
        assert_eq!(matches[0].indices, vec![2, 3, 4]);
    }

    #[test]
    fn test_matches_in_row_major_order() {
        let g = grid([
            [H6, H6, H6, A, K],
            [H1, H2, H3, H4, H5],
            [Ten, J, J, J, J],
        ]);
        let eval = evaluate(&g);
        assert_eq!(eval.matches.len(), 2);
        assert_eq!(eval.matches[0].symbol, H6);
        assert_eq!(eval.matches[1].symbol, J);
        assert_eq!(eval.matches[1].indices, vec![11, 12, 13, 14]);
        assert_eq!(eval.win_amount, 70);
        assert_eq!(eval.matched_cells().count(), 7);
    }

    #[test]
    fn test_absent_cells_break_runs() {
        let mut g = grid([
            [A, A, A, A, A],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        g.set(0, 2, None).unwrap();
        assert!(find_matches(&g).is_empty());

        g.set(0, 0, None).unwrap();
        g.set(0, 1, None).unwrap();
        g.set(0, 2, Some(A)).unwrap();
        let matches = find_matches(&g);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].indices, vec![2, 3, 4]);
    }

    #[test]
    fn test_empty_grid() {
        assert!(find_matches(&Grid::empty()).is_empty());
    }

    #[test]
    fn test_bonus_matches_like_any_symbol() {
        let g = grid([
            [Bonus, Bonus, Bonus, A, K],
            [H1, H2, H3, H4, H5],
            [M1, M2, M3, M4, M5],
        ]);
        let eval = evaluate(&g);
        assert_eq!(eval.matches[0].symbol, Bonus);
        assert_eq!(eval.win_amount, 30);
    }
}
