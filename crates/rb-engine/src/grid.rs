//! 4×6 symbol grid, generation, and the per-column scatter cap

use serde::{Deserialize, Serialize};

use crate::config::ColumnPool;
use crate::rng::SeededRng;
use crate::symbols::Symbol;

/// Visible rows per column.
pub const ROWS: usize = 4;
/// Reel columns.
pub const COLS: usize = 6;

/// A fixed 4×6 matrix of symbols, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Symbol; COLS]; ROWS],
}

impl Grid {
    /// Grid with every cell set to `symbol`.
    pub fn filled(symbol: Symbol) -> Self {
        Self {
            cells: [[symbol; COLS]; ROWS],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Symbol {
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, symbol: Symbol) {
        self.cells[row][col] = symbol;
    }

    /// Iterate cells row-major as `(row, col, symbol)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Symbol)> + '_ {
        (0..ROWS).flat_map(move |r| (0..COLS).map(move |c| (r, c, self.cells[r][c])))
    }

    /// Row indices in `col` holding exactly `symbol`, ascending.
    pub fn column_hits(&self, col: usize, symbol: Symbol) -> Vec<usize> {
        (0..ROWS).filter(|&r| self.cells[r][col] == symbol).collect()
    }

    /// Number of scatter symbols anywhere on the grid.
    pub fn scatter_count(&self) -> usize {
        self.iter().filter(|&(_, _, s)| s.is_scatter()).count()
    }

    /// Whether any cell is still an unrevealed mystery.
    pub fn has_mystery(&self) -> bool {
        self.iter().any(|(_, _, s)| s.is_mystery())
    }
}

/// Draw a full grid, each cell sampled independently from its column pool.
///
/// Cells are drawn row-major (row 0 column 0 through row 3 column 5); the
/// order is part of the reproducibility contract.
pub(crate) fn generate(rng: &mut SeededRng, pools: &[ColumnPool; COLS]) -> Grid {
    let mut grid = Grid::filled(Symbol::Cherry);
    for row in 0..ROWS {
        for col in 0..COLS {
            grid.set(row, col, pools[col].sample(rng));
        }
    }
    grid
}

/// Enforce at most one scatter per column.
///
/// A deliberate volatility cap, not an artifact of the weights: whenever a
/// column drew more than one scatter, every scatter after the first (top to
/// bottom) is resampled from a scatter-free variant of that column's pool.
/// Repairs run columns ascending, rows ascending.
pub(crate) fn cap_column_scatters(grid: &mut Grid, rng: &mut SeededRng, pools: &[ColumnPool; COLS]) {
    for col in 0..COLS {
        let scatter_rows = grid.column_hits(col, Symbol::Scatter);
        if scatter_rows.len() <= 1 {
            continue;
        }
        let fallback = pools[col].without(Symbol::Scatter);
        for &row in &scatter_rows[1..] {
            grid.set(row, col, fallback.sample(rng));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightedEntry;

    fn single_symbol_pools(symbol: Symbol) -> [ColumnPool; COLS] {
        std::array::from_fn(|_| {
            ColumnPool::new(vec![WeightedEntry {
                symbol,
                weight: 1.0,
            }])
        })
    }

    #[test]
    fn generate_fills_from_pools() {
        let mut rng = SeededRng::new(1);
        let grid = generate(&mut rng, &single_symbol_pools(Symbol::Star));
        assert!(grid.iter().all(|(_, _, s)| s == Symbol::Star));
    }

    #[test]
    fn generate_is_deterministic() {
        let pools: [ColumnPool; COLS] = std::array::from_fn(|_| {
            ColumnPool::new(vec![
                WeightedEntry {
                    symbol: Symbol::Cherry,
                    weight: 3.0,
                },
                WeightedEntry {
                    symbol: Symbol::Bell,
                    weight: 1.0,
                },
            ])
        });
        let mut a = SeededRng::new(777);
        let mut b = SeededRng::new(777);
        assert_eq!(generate(&mut a, &pools), generate(&mut b, &pools));
    }

    #[test]
    fn scatter_cap_leaves_at_most_one_per_column() {
        let pools: [ColumnPool; COLS] = std::array::from_fn(|_| {
            ColumnPool::new(vec![
                WeightedEntry {
                    symbol: Symbol::Scatter,
                    weight: 50.0,
                },
                WeightedEntry {
                    symbol: Symbol::Lemon,
                    weight: 1.0,
                },
            ])
        });
        let mut rng = SeededRng::new(2024);
        for _ in 0..50 {
            let mut grid = generate(&mut rng, &pools);
            cap_column_scatters(&mut grid, &mut rng, &pools);
            for col in 0..COLS {
                assert!(grid.column_hits(col, Symbol::Scatter).len() <= 1);
            }
        }
    }

    #[test]
    fn scatter_cap_keeps_first_scatter() {
        let pools = single_symbol_pools(Symbol::Lemon);
        let mut grid = Grid::filled(Symbol::Lemon);
        grid.set(1, 2, Symbol::Scatter);
        grid.set(3, 2, Symbol::Scatter);
        let mut rng = SeededRng::new(9);
        cap_column_scatters(&mut grid, &mut rng, &pools);
        assert_eq!(grid.get(1, 2), Symbol::Scatter);
        assert_eq!(grid.get(3, 2), Symbol::Lemon);
    }

    #[test]
    fn column_hits_are_ascending() {
        let mut grid = Grid::filled(Symbol::Cherry);
        grid.set(0, 4, Symbol::Diamond);
        grid.set(3, 4, Symbol::Diamond);
        assert_eq!(grid.column_hits(4, Symbol::Diamond), vec![0, 3]);
        assert_eq!(grid.scatter_count(), 0);
    }
}
