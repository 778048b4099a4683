//! Paytable and ways-pay evaluation

use serde::{Deserialize, Serialize};

use crate::grid::{COLS, Grid};
use crate::symbols::Symbol;

/// Shortest run that can pay.
pub const MIN_RUN: usize = 3;

/// Bet multipliers per paying symbol and run length (3 through 6).
///
/// Entries may be sparse: an undefined (or non-positive) length simply does
/// not pay, and the evaluator falls back to the longest defined length
/// inside the contiguous run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paytable {
    pays: [[Option<f64>; 4]; Symbol::PAYING_COUNT],
}

impl Paytable {
    /// Empty table; nothing pays.
    pub fn empty() -> Self {
        Self {
            pays: [[None; 4]; Symbol::PAYING_COUNT],
        }
    }

    /// The standard fruit paytable.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        let rows: [(Symbol, [f64; 4]); 10] = [
            (Symbol::Cherry, [0.20, 0.35, 0.70, 1.40]),
            (Symbol::Lemon, [0.20, 0.35, 0.70, 1.40]),
            (Symbol::Grape, [0.22, 0.40, 0.80, 1.60]),
            (Symbol::Orange, [0.22, 0.40, 0.80, 1.60]),
            (Symbol::Kiwi, [0.24, 0.45, 0.90, 1.80]),
            (Symbol::Coconut, [0.24, 0.45, 0.90, 1.80]),
            (Symbol::Bell, [0.35, 0.80, 1.80, 3.60]),
            (Symbol::Star, [0.45, 1.10, 2.30, 4.80]),
            (Symbol::Diamond, [0.70, 1.60, 3.50, 7.50]),
            (Symbol::Clover, [0.90, 2.20, 5.00, 10.00]),
        ];
        for (symbol, pays) in rows {
            for (i, pay) in pays.into_iter().enumerate() {
                table.set_pay(symbol, MIN_RUN + i, Some(pay));
            }
        }
        table
    }

    /// Multiplier for `length` of `symbol`, if defined and positive.
    pub fn pay(&self, symbol: Symbol, length: usize) -> Option<f64> {
        if !(MIN_RUN..=COLS).contains(&length) {
            return None;
        }
        let idx = symbol.paying_index()?;
        self.pays[idx][length - MIN_RUN].filter(|&p| p > 0.0)
    }

    /// Define (or clear) the multiplier for `length` of `symbol`.
    pub fn set_pay(&mut self, symbol: Symbol, length: usize, pay: Option<f64>) {
        if let Some(idx) = symbol.paying_index() {
            if (MIN_RUN..=COLS).contains(&length) {
                self.pays[idx][length - MIN_RUN] = pay;
            }
        }
    }

    /// Ways-pay evaluation of a grid.
    ///
    /// For each paying symbol present in column 0, the contiguous run of
    /// columns containing the symbol (from column 0) is measured; the
    /// longest payable length within the run wins, paying
    /// `ways × multiplier × bet` where `ways` is the product of per-column
    /// match counts. A single best part is kept per symbol. Pure function:
    /// no side effects, no randomness.
    pub fn evaluate(&self, grid: &Grid, bet: f64) -> EvalResult {
        let mut parts: Vec<WinPart> = Vec::new();

        for symbol in Symbol::PAYING {
            let mut hits_per_col: Vec<Vec<usize>> = Vec::with_capacity(COLS);
            for col in 0..COLS {
                let hits = grid.column_hits(col, symbol);
                if hits.is_empty() {
                    break;
                }
                hits_per_col.push(hits);
            }
            if hits_per_col.len() < MIN_RUN {
                continue;
            }

            let max_len = hits_per_col.len();
            let Some((length, pay)) = (MIN_RUN..=max_len)
                .rev()
                .find_map(|len| self.pay(symbol, len).map(|p| (len, p)))
            else {
                continue;
            };

            let ways: u64 = hits_per_col[..length]
                .iter()
                .map(|hits| hits.len() as u64)
                .product();
            let amount = ways as f64 * pay * bet;

            let mut positions = Vec::new();
            for (col, hits) in hits_per_col[..length].iter().enumerate() {
                for &row in hits {
                    positions.push((row, col));
                }
            }

            parts.push(WinPart {
                symbol,
                length,
                ways,
                positions,
                amount,
            });
        }

        parts.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        let total = parts.iter().map(|p| p.amount).sum();
        EvalResult { total, parts }
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::standard()
    }
}

/// One winning run of a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinPart {
    pub symbol: Symbol,
    /// Contiguous run length paid (3..=6).
    pub length: usize,
    /// Product of per-column match counts over the paid run.
    pub ways: u64,
    /// Matched `(row, col)` cells across the paid run.
    pub positions: Vec<(usize, usize)>,
    /// `ways × multiplier × bet`.
    pub amount: f64,
}

/// Outcome of evaluating one grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvalResult {
    pub total: f64,
    /// Winning parts, best first.
    pub parts: Vec<WinPart>,
}

impl EvalResult {
    pub fn is_win(&self) -> bool {
        self.total > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Column-major shorthand for readable test grids.
    fn grid_from_columns(columns: [[Symbol; 4]; 6]) -> Grid {
        let mut grid = Grid::filled(Symbol::Cherry);
        for (c, col) in columns.iter().enumerate() {
            for (r, &s) in col.iter().enumerate() {
                grid.set(r, c, s);
            }
        }
        grid
    }

    use Symbol::*;

    #[test]
    fn ways_multiply_across_run() {
        // Cherry: col0 {0,1}, col1 {0,2}, col2 {0}, col3 none.
        let grid = grid_from_columns([
            [Cherry, Cherry, Lemon, Grape],
            [Cherry, Bell, Cherry, Star],
            [Cherry, Orange, Kiwi, Clover],
            [Lemon, Bell, Star, Grape],
            [Bell, Orange, Kiwi, Star],
            [Lemon, Bell, Star, Grape],
        ]);
        let result = Paytable::standard().evaluate(&grid, 2.0);
        let part = result
            .parts
            .iter()
            .find(|p| p.symbol == Cherry)
            .expect("cherry run");
        assert_eq!(part.length, 3);
        assert_eq!(part.ways, 4);
        assert_relative_eq!(part.amount, 4.0 * 0.20 * 2.0);
        assert_eq!(part.positions.len(), 5);
        assert!(part.positions.contains(&(0, 0)));
        assert!(part.positions.contains(&(1, 0)));
        assert!(part.positions.contains(&(0, 1)));
        assert!(part.positions.contains(&(2, 1)));
        assert!(part.positions.contains(&(0, 2)));
    }

    #[test]
    fn ways_are_product_of_column_hit_counts() {
        // Star: 2 rows in column 0, 1 in column 1, 3 in column 2, none in
        // column 3.
        let grid = grid_from_columns([
            [Star, Star, Lemon, Grape],
            [Star, Bell, Orange, Kiwi],
            [Star, Star, Star, Lemon],
            [Lemon, Bell, Orange, Grape],
            [Kiwi, Orange, Lemon, Bell],
            [Lemon, Bell, Orange, Grape],
        ]);
        let result = Paytable::standard().evaluate(&grid, 1.0);
        let part = result.parts.iter().find(|p| p.symbol == Star).unwrap();
        assert_eq!(part.length, 3);
        assert_eq!(part.ways, 2 * 1 * 3);
        assert_eq!(part.positions.len(), 6);
        assert_relative_eq!(part.amount, 6.0 * 0.45);
    }

    #[test]
    fn run_must_start_at_column_zero() {
        // Diamonds in columns 1..3 only never pay.
        let grid = grid_from_columns([
            [Cherry, Lemon, Grape, Orange],
            [Diamond, Diamond, Diamond, Diamond],
            [Diamond, Diamond, Diamond, Diamond],
            [Diamond, Diamond, Diamond, Diamond],
            [Cherry, Lemon, Grape, Orange],
            [Cherry, Lemon, Grape, Orange],
        ]);
        let result = Paytable::standard().evaluate(&grid, 1.0);
        assert!(result.parts.iter().all(|p| p.symbol != Diamond));
    }

    #[test]
    fn no_run_pays_nothing() {
        let grid = grid_from_columns([
            [Cherry, Lemon, Grape, Orange],
            [Kiwi, Coconut, Bell, Star],
            [Cherry, Lemon, Grape, Orange],
            [Kiwi, Coconut, Bell, Star],
            [Cherry, Lemon, Grape, Orange],
            [Kiwi, Coconut, Bell, Star],
        ]);
        let result = Paytable::standard().evaluate(&grid, 1.0);
        assert_eq!(result.total, 0.0);
        assert!(result.parts.is_empty());
        assert!(!result.is_win());
    }

    #[test]
    fn sparse_paytable_falls_back_to_shorter_run() {
        let mut table = Paytable::standard();
        table.set_pay(Bell, 5, None);
        // Bell runs the full five columns but only length 4 is payable.
        let grid = grid_from_columns([
            [Bell, Cherry, Lemon, Grape],
            [Bell, Orange, Kiwi, Coconut],
            [Bell, Cherry, Lemon, Grape],
            [Bell, Orange, Kiwi, Coconut],
            [Bell, Cherry, Lemon, Grape],
            [Cherry, Orange, Kiwi, Coconut],
        ]);
        let result = table.evaluate(&grid, 1.0);
        let part = result.parts.iter().find(|p| p.symbol == Bell).unwrap();
        assert_eq!(part.length, 4);
        assert_relative_eq!(part.amount, 0.80);
    }

    #[test]
    fn fully_sparse_symbol_contributes_nothing() {
        let mut table = Paytable::standard();
        for len in 3..=6 {
            table.set_pay(Kiwi, len, None);
        }
        let grid = Grid::filled(Kiwi);
        let result = table.evaluate(&grid, 1.0);
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn one_best_part_per_symbol_sorted_descending() {
        // Cherry pays a short run, clover a full-width one; clover sorts
        // first and appears exactly once.
        let grid = grid_from_columns([
            [Clover, Cherry, Cherry, Cherry],
            [Clover, Cherry, Lemon, Grape],
            [Cherry, Clover, Lemon, Grape],
            [Lemon, Clover, Grape, Kiwi],
            [Clover, Lemon, Grape, Kiwi],
            [Lemon, Grape, Clover, Kiwi],
        ]);
        let result = Paytable::standard().evaluate(&grid, 1.0);
        assert_eq!(
            result.parts.iter().filter(|p| p.symbol == Clover).count(),
            1
        );
        assert_eq!(result.parts[0].symbol, Clover);
        assert_eq!(result.parts[0].length, 6);
        assert_eq!(result.parts[0].ways, 1);
        let cherry = result.parts.iter().find(|p| p.symbol == Cherry).unwrap();
        assert_eq!(cherry.length, 3);
        assert_eq!(cherry.ways, 3);
        for pair in result.parts.windows(2) {
            assert!(pair[0].amount >= pair[1].amount);
        }
        assert_relative_eq!(
            result.total,
            result.parts.iter().map(|p| p.amount).sum::<f64>()
        );
    }

    #[test]
    fn mystery_and_scatter_never_pay() {
        let grid = Grid::filled(Symbol::Scatter);
        assert_eq!(Paytable::standard().evaluate(&grid, 1.0).total, 0.0);
        let grid = Grid::filled(Symbol::Mystery);
        assert_eq!(Paytable::standard().evaluate(&grid, 1.0).total, 0.0);
    }
}
