//! Engine configuration: reel pools, tuning constants, validation

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, PoolKind};
use crate::grid::COLS;
use crate::paytable::Paytable;
use crate::rng::{SeededRng, pick_weighted};
use crate::symbols::{Symbol, SymbolWeights};

/// One entry of a column pool.
///
/// A weight of zero keeps the symbol structurally present while disabling
/// natural draws; this is how mystery stays in the base pool without ever
/// landing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry {
    pub symbol: Symbol,
    pub weight: f64,
}

/// Ordered weighted symbol list for one grid column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPool {
    entries: Vec<WeightedEntry>,
}

impl ColumnPool {
    pub fn new(entries: Vec<WeightedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WeightedEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Combined weight of `symbol` in this pool.
    pub fn weight_of(&self, symbol: Symbol) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.symbol == symbol)
            .map(|e| e.weight)
            .sum()
    }

    /// Multiply the weight of every entry matching `symbol`.
    pub fn scale_symbol(&mut self, symbol: Symbol, factor: f64) {
        for entry in &mut self.entries {
            if entry.symbol == symbol {
                entry.weight *= factor;
            }
        }
    }

    /// Copy of this pool with every entry for `symbol` removed.
    pub fn without(&self, symbol: Symbol) -> ColumnPool {
        ColumnPool {
            entries: self
                .entries
                .iter()
                .copied()
                .filter(|e| e.symbol != symbol)
                .collect(),
        }
    }

    /// Draw one symbol. Pools are validated non-empty with positive total
    /// at configuration time; on a violated invariant the first symbol is
    /// returned rather than panicking.
    pub fn sample(&self, rng: &mut SeededRng) -> Symbol {
        debug_assert!(!self.entries.is_empty());
        pick_weighted(rng, &self.entries, |e| e.weight)
            .map(|e| e.symbol)
            .unwrap_or(Symbol::Cherry)
    }

    fn validate(&self, pool: PoolKind, column: usize) -> EngineResult<()> {
        if self.entries.is_empty() {
            return Err(EngineError::EmptyColumnPool { pool, column });
        }
        if let Some(entry) = self.entries.iter().find(|e| e.weight < 0.0) {
            return Err(EngineError::NegativeWeight {
                pool,
                column,
                symbol: entry.symbol,
            });
        }
        if self.total_weight() <= 0.0 {
            return Err(EngineError::ZeroPoolWeight { pool, column });
        }
        Ok(())
    }
}

/// Mystery burst tuning (base game only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstConfig {
    /// Chance that a spin carries a burst. Exactly zero or one per spin.
    pub chance: f64,
    /// Cluster walk length range (inclusive).
    pub size_min: usize,
    pub size_max: usize,
    /// Chance to force a cluster cell into column 0 / column 1 when the
    /// walk missed it. Biases clusters toward the early reels.
    pub force_col0_prob: f64,
    pub force_col1_prob: f64,
    /// Chance the whole cluster reveals to one shared symbol.
    pub single_reveal_prob: f64,
}

/// Complete static engine configuration.
///
/// Validated once before any spin is accepted; all spin-time operations
/// are total over a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelConfig {
    /// Base-game pools, one per column. Mystery is present at weight 0.
    pub base_pools: [ColumnPool; COLS],
    /// Bonus pools, one per column. No scatter, no mystery.
    pub bonus_pools: [ColumnPool; COLS],
    pub paytable: Paytable,
    pub burst: BurstConfig,

    /// Reveal weight tables for mystery cells (base) and sticky cells
    /// (bonus). The bonus table is deliberately tilted toward low pays.
    pub base_reveal_weights: SymbolWeights,
    pub bonus_reveal_weights: SymbolWeights,
    /// Per-count linear boost for symbols already on columns 0 and 1.
    pub alignment_boost: [f64; 2],
    /// Fixed boosts for the paying symbol one / two cells to the left in
    /// the same row.
    pub same_row_boost: [f64; 2],

    /// Fixed bonus length in spins.
    pub free_spin_count: u32,
    /// Starting taper of the target weight per column; column 0 stays at
    /// full weight.
    pub bonus_col_scale: [f64; COLS],
    /// Applied once to a column's target weight whenever it sticks.
    pub on_stick_taper: f64,
    /// Applied once more per sticky already in the column: the soft cap.
    pub per_extra_sticky_decay: f64,
    /// Per-symbol multipliers applied to the summed bonus-pool weights
    /// when drawing the session target.
    pub target_pick_multipliers: SymbolWeights,

    /// Scatters needed anywhere on a base grid to trigger the bonus.
    pub scatter_trigger_count: usize,
    /// Bonus buy price as a multiple of the bet.
    pub bonus_buy_cost: f64,
    /// Selectable bet levels, for hosts.
    pub bet_levels: Vec<f64>,
}

/// Per-reel master weights shared by every column of the standard game.
const MASTER_REEL: [(Symbol, f64); 12] = [
    (Symbol::Cherry, 18.0),
    (Symbol::Lemon, 18.0),
    (Symbol::Grape, 16.0),
    (Symbol::Orange, 16.0),
    (Symbol::Kiwi, 14.0),
    (Symbol::Coconut, 14.0),
    (Symbol::Bell, 10.0),
    (Symbol::Star, 8.0),
    (Symbol::Diamond, 6.0),
    (Symbol::Clover, 6.0),
    (Symbol::Scatter, 1.0),
    (Symbol::Mystery, 2.0),
];

impl ReelConfig {
    /// The standard tuning. Every column shares the same weights; the type
    /// supports asymmetric columns for volatility shaping.
    pub fn standard() -> Self {
        let base_column = ColumnPool::new(
            MASTER_REEL
                .iter()
                .map(|&(symbol, weight)| WeightedEntry {
                    symbol,
                    // Mystery never lands naturally; bursts are its only
                    // source in the base game.
                    weight: if symbol.is_mystery() { 0.0 } else { weight },
                })
                .collect(),
        );
        let bonus_column = ColumnPool::new(
            MASTER_REEL
                .iter()
                .filter(|(symbol, _)| symbol.is_paying())
                .map(|&(symbol, weight)| WeightedEntry { symbol, weight })
                .collect(),
        );

        Self {
            base_pools: std::array::from_fn(|_| base_column.clone()),
            bonus_pools: std::array::from_fn(|_| bonus_column.clone()),
            paytable: Paytable::standard(),
            burst: BurstConfig {
                chance: 0.16,
                size_min: 6,
                size_max: 14,
                force_col0_prob: 0.60,
                force_col1_prob: 0.35,
                single_reveal_prob: 0.19,
            },
            base_reveal_weights: SymbolWeights::new([
                1.08, 1.08, 1.18, 1.18, 1.15, 1.15, 1.02, 0.98, 0.92, 0.90,
            ]),
            bonus_reveal_weights: SymbolWeights::new([
                1.30, 1.30, 1.15, 1.15, 1.05, 1.05, 0.95, 0.85, 0.80, 0.75,
            ]),
            alignment_boost: [0.15, 0.15],
            same_row_boost: [1.1, 1.4],
            free_spin_count: 7,
            bonus_col_scale: [1.00, 0.90, 0.85, 0.80, 0.76, 0.72],
            on_stick_taper: 0.88,
            per_extra_sticky_decay: 0.55,
            target_pick_multipliers: SymbolWeights::new([
                0.60, 0.60, 0.75, 0.75, 0.90, 0.90, 1.05, 1.10, 1.10, 1.10,
            ]),
            scatter_trigger_count: 3,
            bonus_buy_cost: 100.0,
            bet_levels: vec![
                0.1, 0.2, 0.3, 0.5, 0.8, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 20.0, 50.0, 100.0,
            ],
        }
    }

    /// Check every pool and weight table. Fatal before any spin is
    /// accepted; nothing is validated again mid-session.
    pub fn validate(&self) -> EngineResult<()> {
        for (column, pool) in self.base_pools.iter().enumerate() {
            pool.validate(PoolKind::Base, column)?;
            // The scatter cap resamples from the scatter-free variant, so
            // that variant must also be drawable.
            pool.without(Symbol::Scatter)
                .validate(PoolKind::BaseScatterFree, column)?;
        }
        for (column, pool) in self.bonus_pools.iter().enumerate() {
            pool.validate(PoolKind::Bonus, column)?;
        }
        if self.base_reveal_weights.total() <= 0.0 {
            return Err(EngineError::ZeroTableWeight {
                table: "base_reveal_weights",
            });
        }
        if self.bonus_reveal_weights.total() <= 0.0 {
            return Err(EngineError::ZeroTableWeight {
                table: "bonus_reveal_weights",
            });
        }
        if self.target_pick_weights().total() <= 0.0 {
            return Err(EngineError::ZeroTableWeight {
                table: "target_pick_weights",
            });
        }
        Ok(())
    }

    /// The session-target distribution: each paying symbol's weight summed
    /// across the bonus pool's columns, scaled by the configured per-symbol
    /// multiplier.
    pub fn target_pick_weights(&self) -> SymbolWeights {
        let mut weights = SymbolWeights::zero();
        for pool in &self.bonus_pools {
            for entry in pool.entries() {
                weights.add(entry.symbol, entry.weight);
            }
        }
        for symbol in Symbol::PAYING {
            weights.scale(symbol, self.target_pick_multipliers.get(symbol));
        }
        weights
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self::standard()
    }
}
