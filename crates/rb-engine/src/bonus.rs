//! Sticky-target bonus session.
//!
//! A session chases one target symbol over a fixed number of free spins.
//! Target cells landing on columns 1..5 stick for the rest of the session;
//! every stick tapers that column's target weight in the session's private
//! pool copy, with a geometric extra decay per sticky already present (the
//! soft cap). Each spin draws one reveal symbol applied to every sticky
//! cell at once, never per cell.

use serde::{Deserialize, Serialize};

use crate::config::{ColumnPool, ReelConfig};
use crate::grid::{self, COLS, Grid, ROWS};
use crate::paytable::EvalResult;
use crate::rng::SeededRng;
use crate::symbols::Symbol;

/// Live state of one bonus session. Created on trigger (or buy), destroyed
/// when the last spin resolves or the session is cancelled; the tapered
/// pool copy is owned here exclusively and never aliases the static
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusSession {
    target: Symbol,
    bet: f64,
    pools: [ColumnPool; COLS],
    sticky: Vec<(usize, usize)>,
    sticky_per_col: [u32; COLS],
    spins_total: u32,
    spins_remaining: u32,
    total_win: f64,
}

/// Outcome of one bonus spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusSpinResult {
    /// 1-based spin number within the session.
    pub spin_index: u32,
    /// The grid as drawn, before stickies are applied.
    pub drawn_grid: Grid,
    /// Cells that became sticky on this spin.
    pub new_sticky: Vec<(usize, usize)>,
    /// All sticky cells after this spin, in landing order.
    pub sticky: Vec<(usize, usize)>,
    /// The symbol every sticky cell shows this spin.
    pub reveal_symbol: Symbol,
    /// Drawn grid with stickies overwritten by the reveal symbol.
    pub composite_grid: Grid,
    pub eval: EvalResult,
    /// Session winnings including this spin.
    pub session_total: f64,
    pub spins_remaining: u32,
}

impl BonusSession {
    /// Start a session for `target`: clone the bonus pools and apply the
    /// per-column starting taper (column 0 keeps full weight).
    pub(crate) fn new(target: Symbol, bet: f64, config: &ReelConfig) -> Self {
        let mut pools = config.bonus_pools.clone();
        for (col, pool) in pools.iter_mut().enumerate().skip(1) {
            pool.scale_symbol(target, config.bonus_col_scale[col]);
        }
        Self {
            target,
            bet,
            pools,
            sticky: Vec::new(),
            sticky_per_col: [0; COLS],
            spins_total: config.free_spin_count,
            spins_remaining: config.free_spin_count,
            total_win: 0.0,
        }
    }

    pub fn target(&self) -> Symbol {
        self.target
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn total_win(&self) -> f64 {
        self.total_win
    }

    /// Sticky cells in landing order.
    pub fn sticky(&self) -> &[(usize, usize)] {
        &self.sticky
    }

    /// Current weight of the target symbol in one session pool column.
    pub fn column_target_weight(&self, col: usize) -> f64 {
        self.pools[col].weight_of(self.target)
    }

    /// Whether all spins have resolved.
    pub fn is_finished(&self) -> bool {
        self.spins_remaining == 0
    }

    /// Run one spin. The caller guards against advancing a finished
    /// session.
    pub(crate) fn advance(&mut self, rng: &mut SeededRng, config: &ReelConfig) -> BonusSpinResult {
        debug_assert!(self.spins_remaining > 0);

        let drawn = grid::generate(rng, &self.pools);
        let new_sticky = self.absorb_stickies(&drawn, config);

        let reveal_symbol = config.bonus_reveal_weights.sample(rng);
        let mut composite = drawn;
        for &(row, col) in &self.sticky {
            composite.set(row, col, reveal_symbol);
        }

        let eval = config.paytable.evaluate(&composite, self.bet);
        self.total_win += eval.total;
        self.spins_remaining -= 1;

        log::trace!(
            "bonus spin {}/{}: {} new stickies, win {:.2}",
            self.spins_total - self.spins_remaining,
            self.spins_total,
            new_sticky.len(),
            eval.total
        );

        BonusSpinResult {
            spin_index: self.spins_total - self.spins_remaining,
            drawn_grid: drawn,
            new_sticky,
            sticky: self.sticky.clone(),
            reveal_symbol,
            composite_grid: composite,
            eval,
            session_total: self.total_win,
            spins_remaining: self.spins_remaining,
        }
    }

    /// Record target cells landing on columns 1..5 and taper each column
    /// that received new stickies: once by the on-stick factor, then once
    /// more per sticky the column already held before this spin. Returns
    /// the cells that became sticky this spin.
    fn absorb_stickies(&mut self, drawn: &Grid, config: &ReelConfig) -> Vec<(usize, usize)> {
        let mut new_sticky = Vec::new();
        let mut new_per_col = [0u32; COLS];
        for row in 0..ROWS {
            for col in 1..COLS {
                if drawn.get(row, col) == self.target && !self.sticky.contains(&(row, col)) {
                    self.sticky.push((row, col));
                    new_sticky.push((row, col));
                    new_per_col[col] += 1;
                }
            }
        }
        for col in 1..COLS {
            if new_per_col[col] == 0 {
                continue;
            }
            self.pools[col].scale_symbol(self.target, config.on_stick_taper);
            for _ in 0..self.sticky_per_col[col] {
                self.pools[col].scale_symbol(self.target, config.per_extra_sticky_decay);
            }
            self.sticky_per_col[col] += new_per_col[col];
        }
        new_sticky
    }
}
