//! Interactive engine facade.
//!
//! Owns the rng stream and composes the pipeline: pool-driven grid draw,
//! scatter cap, mystery burst, ways evaluation, scatter trigger, bonus
//! session. All computation is synchronous and single-threaded; the engine
//! never waits, so hosts drive spins at their own cadence. Draws from the
//! stream happen in a fixed, documented order per operation — that order
//! is the reproducibility contract.

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusSession, BonusSpinResult};
use crate::config::ReelConfig;
use crate::error::{EngineError, EngineResult};
use crate::grid::{self, Grid};
use crate::mystery::{self, BurstOutcome};
use crate::paytable::EvalResult;
use crate::rng::SeededRng;
use crate::symbols::Symbol;

/// Outcome of one base spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSpinResult {
    /// Final grid, after the scatter cap and any mystery reveal.
    pub grid: Grid,
    /// The burst that hit this spin, if any.
    pub burst: Option<BurstOutcome>,
    pub eval: EvalResult,
    pub scatter_count: usize,
    /// Set when the grid triggered the bonus; carries the drawn target.
    /// The session itself is started explicitly by the host.
    pub bonus_trigger: Option<Symbol>,
}

/// Running statistics over one engine instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_wagered: f64,
    pub total_won: f64,
    pub wins: u64,
    pub bonus_rounds: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Return-to-player percentage so far.
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0.0 {
            self.total_won / self.total_wagered * 100.0
        } else {
            0.0
        }
    }

    /// Fraction of base spins that paid anything.
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.wins as f64 / self.total_spins as f64
        } else {
            0.0
        }
    }

    fn record_base(&mut self, bet: f64, win: f64) {
        self.total_spins += 1;
        self.total_wagered += bet;
        self.total_won += win;
        if win > 0.0 {
            self.wins += 1;
        }
        let ratio = win / bet;
        if ratio > self.max_win_ratio {
            self.max_win_ratio = ratio;
        }
    }

    fn record_bonus(&mut self, total: f64) {
        self.bonus_rounds += 1;
        self.total_won += total;
    }
}

/// The deterministic slot engine.
pub struct SlotEngine {
    config: ReelConfig,
    rng: SeededRng,
    session: Option<BonusSession>,
    stats: SessionStats,
}

impl SlotEngine {
    /// Create an engine. The configuration is validated here, before any
    /// spin is accepted.
    pub fn new(config: ReelConfig, seed: u32) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: SeededRng::new(seed),
            session: None,
            stats: SessionStats::default(),
        })
    }

    /// Engine with the standard configuration.
    pub fn standard(seed: u32) -> Self {
        // The standard config is covered by tests; validation cannot fail.
        Self {
            config: ReelConfig::standard(),
            rng: SeededRng::new(seed),
            session: None,
            stats: SessionStats::default(),
        }
    }

    /// Restart the rng stream. Does not touch statistics or any active
    /// session.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed);
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    /// Execute one base spin.
    ///
    /// Draw order: 24 grid cells row-major, scatter-cap repairs (columns
    /// then rows ascending), burst chance, burst cluster and reveal draws,
    /// and finally the target draw when 3+ scatters landed. Rejected
    /// without consuming randomness while a bonus session is active.
    pub fn spin(&mut self, bet: f64) -> EngineResult<BaseSpinResult> {
        check_bet(bet)?;
        if self.session.is_some() {
            return Err(EngineError::SessionActive);
        }

        let mut grid = grid::generate(&mut self.rng, &self.config.base_pools);
        grid::cap_column_scatters(&mut grid, &mut self.rng, &self.config.base_pools);

        let burst = mystery::apply(&mut grid, &mut self.rng, &self.config);
        let eval = self.config.paytable.evaluate(&grid, bet);
        let scatter_count = grid.scatter_count();

        let bonus_trigger = if scatter_count >= self.config.scatter_trigger_count {
            let target = self.config.target_pick_weights().sample(&mut self.rng);
            log::debug!("bonus triggered: {scatter_count} scatters, target {target}");
            Some(target)
        } else {
            None
        };

        self.stats.record_base(bet, eval.total);

        Ok(BaseSpinResult {
            grid,
            burst,
            eval,
            scatter_count,
            bonus_trigger,
        })
    }

    /// Start a bonus session for an already-selected target (normally the
    /// one carried by a trigger). Rejected without mutating state if a
    /// session is active.
    pub fn start_bonus(&mut self, target: Symbol, bet: f64) -> EngineResult<()> {
        check_bet(bet)?;
        if !target.is_paying() {
            return Err(EngineError::InvalidTarget(target));
        }
        if self.session.is_some() {
            return Err(EngineError::SessionActive);
        }
        log::debug!("bonus session start: target {target}, bet {bet}");
        self.session = Some(BonusSession::new(target, bet, &self.config));
        Ok(())
    }

    /// Buy the bonus: draw a target from the configured distribution and
    /// start a session. The price (`config.bonus_buy_cost × bet`) is the
    /// host's bookkeeping. Returns the drawn target.
    pub fn buy_bonus(&mut self, bet: f64) -> EngineResult<Symbol> {
        check_bet(bet)?;
        if self.session.is_some() {
            return Err(EngineError::SessionActive);
        }
        let target = self.config.target_pick_weights().sample(&mut self.rng);
        self.session = Some(BonusSession::new(target, bet, &self.config));
        Ok(target)
    }

    /// Advance the active session by one spin. After the final spin the
    /// session total is credited to the statistics and the engine returns
    /// to idle; advancing again is a session error.
    pub fn bonus_spin(&mut self) -> EngineResult<BonusSpinResult> {
        // A zero-spin configuration yields an immediately finished session.
        if self.session.as_ref().is_some_and(|s| s.is_finished()) {
            self.session = None;
        }
        let session = self.session.as_mut().ok_or(EngineError::NoSession)?;
        let result = session.advance(&mut self.rng, &self.config);
        if session.is_finished() {
            self.stats.record_bonus(session.total_win());
            self.session = None;
        }
        Ok(result)
    }

    /// Cancel the active session between spins. Sticky set, tapered pool,
    /// and running total are discarded as a unit; nothing is credited.
    pub fn cancel_bonus(&mut self) -> EngineResult<()> {
        if self.session.take().is_none() {
            return Err(EngineError::NoSession);
        }
        Ok(())
    }

    /// The active session, if any.
    pub fn bonus_session(&self) -> Option<&BonusSession> {
        self.session.as_ref()
    }

    pub fn bonus_active(&self) -> bool {
        self.session.is_some()
    }

    /// Current configuration as pretty JSON.
    pub fn export_config(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap_or_default()
    }

    /// Replace the configuration from JSON. Validated before it takes
    /// effect; rejected while a session is active.
    pub fn import_config(&mut self, json: &str) -> EngineResult<()> {
        if self.session.is_some() {
            return Err(EngineError::SessionActive);
        }
        let config: ReelConfig =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

fn check_bet(bet: f64) -> EngineResult<()> {
    if !bet.is_finite() || bet <= 0.0 {
        return Err(EngineError::InvalidBet(bet));
    }
    Ok(())
}
