//! Mystery burst: clustered injection and context-weighted reveal.
//!
//! Base grids never draw mystery naturally (its base-pool weight is zero);
//! this module is the sole source of mystery cells. A spin carries at most
//! one burst. The reveal is biased toward symbols that extend runs: counts
//! on the two early columns and the paying neighbors to the left in the
//! same row all raise a symbol's reveal weight.

use serde::{Deserialize, Serialize};

use crate::config::ReelConfig;
use crate::grid::{COLS, Grid, ROWS};
use crate::rng::SeededRng;
use crate::symbols::{Symbol, SymbolWeights};

/// What a burst did to the grid, for hosts that animate the flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstOutcome {
    /// Distinct cluster cells in walk-visit order.
    pub cells: Vec<(usize, usize)>,
    /// Set when the whole cluster revealed to one shared symbol.
    pub single_reveal: Option<Symbol>,
}

/// Run the burst stage on a freshly drawn base grid.
///
/// Rolls the burst chance (one draw, always), then on success injects a
/// cluster of mystery cells and reveals every one of them to a paying
/// symbol. Post-reveal the grid never contains mystery.
pub(crate) fn apply(
    grid: &mut Grid,
    rng: &mut SeededRng,
    config: &ReelConfig,
) -> Option<BurstOutcome> {
    if !rng.chance(config.burst.chance) {
        return None;
    }

    let steps = rng.range_inclusive(config.burst.size_min, config.burst.size_max);
    let mut cells = random_walk(rng, steps);

    // Nudge the cluster into the early columns so reveals can seed runs.
    if rng.chance(config.burst.force_col0_prob) && !cells.iter().any(|&(_, c)| c == 0) {
        cells.push((rng.index(ROWS), 0));
    }
    if rng.chance(config.burst.force_col1_prob) && !cells.iter().any(|&(_, c)| c == 1) {
        cells.push((rng.index(ROWS), 1));
    }

    for &(row, col) in &cells {
        grid.set(row, col, Symbol::Mystery);
    }
    log::debug!("mystery burst: {} cells", cells.len());

    // Alignment counts are fixed once, after the overwrite; mystery and
    // scatter cells do not count.
    let col0_counts = paying_counts(grid, 0);
    let col1_counts = paying_counts(grid, 1);

    let single_reveal = if rng.chance(config.burst.single_reveal_prob) {
        // One shared symbol for the whole cluster, drawn with the middle
        // cell (by index) as the representative context.
        let mid = cells[cells.len() / 2];
        let weights = reveal_weights(grid, config, &col0_counts, &col1_counts, mid);
        let symbol = weights.sample(rng);
        for &(row, col) in &cells {
            grid.set(row, col, symbol);
        }
        Some(symbol)
    } else {
        // Independent reveals in walk-visit order. Earlier reveals land in
        // the grid before later cells build their weights, so a revealed
        // neighbor can feed the same-row boosts of the next cell.
        for &(row, col) in &cells {
            let weights = reveal_weights(grid, config, &col0_counts, &col1_counts, (row, col));
            grid.set(row, col, weights.sample(rng));
        }
        None
    };

    Some(BurstOutcome {
        cells,
        single_reveal,
    })
}

/// Bounded random walk over the grid. Each step moves to an orthogonal
/// neighbor clamped to the 4×6 bounds; revisits consume a step without
/// growing the cluster, so the result holds between 1 and `steps` distinct
/// cells.
fn random_walk(rng: &mut SeededRng, steps: usize) -> Vec<(usize, usize)> {
    let mut cells: Vec<(usize, usize)> = Vec::with_capacity(steps);
    let mut row = rng.index(ROWS);
    let mut col = rng.index(COLS);
    for _ in 0..steps {
        if !cells.contains(&(row, col)) {
            cells.push((row, col));
        }
        match rng.index(4) {
            0 => row = (row + 1).min(ROWS - 1),
            1 => row = row.saturating_sub(1),
            2 => col = (col + 1).min(COLS - 1),
            _ => col = col.saturating_sub(1),
        }
    }
    cells
}

/// Occurrences of each paying symbol in one column.
fn paying_counts(grid: &Grid, col: usize) -> [u32; Symbol::PAYING_COUNT] {
    let mut counts = [0u32; Symbol::PAYING_COUNT];
    for row in 0..ROWS {
        if let Some(i) = grid.get(row, col).paying_index() {
            counts[i] += 1;
        }
    }
    counts
}

/// Reveal weight table for one mystery cell.
fn reveal_weights(
    grid: &Grid,
    config: &ReelConfig,
    col0_counts: &[u32; Symbol::PAYING_COUNT],
    col1_counts: &[u32; Symbol::PAYING_COUNT],
    cell: (usize, usize),
) -> SymbolWeights {
    let mut weights = config.base_reveal_weights.clone();
    for (i, &symbol) in Symbol::PAYING.iter().enumerate() {
        weights.scale(
            symbol,
            1.0 + config.alignment_boost[0] * f64::from(col0_counts[i]),
        );
        weights.scale(
            symbol,
            1.0 + config.alignment_boost[1] * f64::from(col1_counts[i]),
        );
    }
    let (row, col) = cell;
    if col >= 1 {
        let left = grid.get(row, col - 1);
        if left.is_paying() {
            weights.scale(left, config.same_row_boost[0]);
        }
    }
    if col >= 2 {
        let left2 = grid.get(row, col - 2);
        if left2.is_paying() {
            weights.scale(left2, config.same_row_boost[1]);
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn burst_config(chance: f64, single_reveal_prob: f64) -> ReelConfig {
        let mut config = ReelConfig::standard();
        config.burst.chance = chance;
        config.burst.single_reveal_prob = single_reveal_prob;
        config
    }

    #[test]
    fn no_burst_when_chance_is_zero() {
        let config = burst_config(0.0, 0.19);
        let mut rng = SeededRng::new(5);
        let mut grid = Grid::filled(Symbol::Lemon);
        assert!(apply(&mut grid, &mut rng, &config).is_none());
        assert_eq!(grid, Grid::filled(Symbol::Lemon));
    }

    #[test]
    fn forced_burst_is_contained_and_fully_revealed() {
        let config = burst_config(1.0, 0.19);
        let mut rng = SeededRng::new(20_250_828);
        for _ in 0..200 {
            let mut grid = Grid::filled(Symbol::Lemon);
            let outcome = apply(&mut grid, &mut rng, &config).expect("burst forced");

            // Walk dedup can shrink below size_min; the two forced cells
            // can push past size_max.
            assert!(!outcome.cells.is_empty());
            assert!(outcome.cells.len() <= config.burst.size_max + 2);
            for &(row, col) in &outcome.cells {
                assert!(row < ROWS && col < COLS);
                assert!(grid.get(row, col).is_paying());
            }
            assert!(!grid.has_mystery());
        }
    }

    #[test]
    fn cluster_cells_are_distinct() {
        let config = burst_config(1.0, 0.0);
        let mut rng = SeededRng::new(99);
        for _ in 0..100 {
            let mut grid = Grid::filled(Symbol::Orange);
            let outcome = apply(&mut grid, &mut rng, &config).unwrap();
            let mut seen = outcome.cells.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), outcome.cells.len());
        }
    }

    #[test]
    fn single_reveal_uses_one_symbol_for_whole_cluster() {
        let config = burst_config(1.0, 1.0);
        let mut rng = SeededRng::new(4242);
        for _ in 0..50 {
            let mut grid = Grid::filled(Symbol::Kiwi);
            let outcome = apply(&mut grid, &mut rng, &config).unwrap();
            let symbol = outcome.single_reveal.expect("unified reveal forced");
            for &(row, col) in &outcome.cells {
                assert_eq!(grid.get(row, col), symbol);
            }
        }
    }

    #[test]
    fn independent_reveal_reports_no_single_symbol() {
        let config = burst_config(1.0, 0.0);
        let mut rng = SeededRng::new(7);
        let mut grid = Grid::filled(Symbol::Bell);
        let outcome = apply(&mut grid, &mut rng, &config).unwrap();
        assert!(outcome.single_reveal.is_none());
        assert!(!grid.has_mystery());
    }

    #[test]
    fn reveal_weights_boost_left_neighbors_and_alignment() {
        let config = ReelConfig::standard();
        let mut grid = Grid::filled(Symbol::Mystery);
        // Row 1: diamond two to the left, star directly left of (1, 3).
        grid.set(1, 1, Symbol::Diamond);
        grid.set(1, 2, Symbol::Star);
        let col0 = paying_counts(&grid, 0);
        let col1 = paying_counts(&grid, 1);
        let weights = reveal_weights(&grid, &config, &col0, &col1, (1, 3));

        let base = &config.base_reveal_weights;
        // Star: directly left, no early-column presence.
        assert_relative_eq!(
            weights.get(Symbol::Star),
            base.get(Symbol::Star) * config.same_row_boost[0]
        );
        // Diamond: two left, and one occurrence on column 1.
        assert_relative_eq!(
            weights.get(Symbol::Diamond),
            base.get(Symbol::Diamond)
                * (1.0 + config.alignment_boost[1])
                * config.same_row_boost[1]
        );
        // Untouched symbol keeps its base weight.
        assert_relative_eq!(weights.get(Symbol::Lemon), base.get(Symbol::Lemon));
    }

    #[test]
    fn scatter_neighbor_gets_no_boost() {
        let config = ReelConfig::standard();
        let mut grid = Grid::filled(Symbol::Mystery);
        grid.set(2, 2, Symbol::Scatter);
        let col0 = paying_counts(&grid, 0);
        let col1 = paying_counts(&grid, 1);
        let weights = reveal_weights(&grid, &config, &col0, &col1, (2, 3));
        assert_eq!(weights, config.base_reveal_weights);
    }

    #[test]
    fn walk_respects_step_budget() {
        let mut rng = SeededRng::new(55);
        for steps in 1..=20 {
            let cells = random_walk(&mut rng, steps);
            assert!(!cells.is_empty());
            assert!(cells.len() <= steps);
        }
    }
}
