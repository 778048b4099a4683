//! # rb-sim — batch spin simulator
//!
//! Runs the engine pipeline for hundreds of thousands of spins to estimate
//! RTP and hit rate, either base game only, bought bonus rounds, or the
//! full scatter-trigger pipeline. Purely computational: no timing, no I/O,
//! single-threaded. Every run drives a private engine with its own seed,
//! so batch simulation never perturbs an interactive stream.

use serde::{Deserialize, Serialize};

use rb_engine::{EngineResult, ReelConfig, SlotEngine, Symbol};

/// Batch run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Spins for base/full runs, rounds for bonus runs.
    pub iterations: u64,
    pub bet: f64,
    /// Seed for the run's private rng stream.
    pub seed: u32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            bet: 1.0,
            seed: 123_456,
        }
    }
}

/// Aggregate result of a base-game-only run. Natural triggers are counted
/// but no bonus session is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseReport {
    pub spins: u64,
    pub bet: f64,
    pub total_wagered: f64,
    pub total_won: f64,
    pub hit_count: u64,
    pub trigger_count: u64,
}

impl BaseReport {
    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            self.hit_count as f64 / self.spins as f64
        } else {
            0.0
        }
    }

    pub fn rtp_percent(&self) -> f64 {
        if self.total_wagered > 0.0 {
            self.total_won / self.total_wagered * 100.0
        } else {
            0.0
        }
    }
}

/// Rounds and winnings attributed to one target symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStats {
    pub symbol: Symbol,
    pub rounds: u64,
    pub total_won: f64,
}

impl TargetStats {
    pub fn avg_win(&self) -> f64 {
        if self.rounds > 0 {
            self.total_won / self.rounds as f64
        } else {
            0.0
        }
    }

    pub fn rtp_percent(&self, round_cost: f64) -> f64 {
        if self.rounds > 0 && round_cost > 0.0 {
            self.avg_win() / round_cost * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregate result of a bought-bonus run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusReport {
    pub rounds: u64,
    pub bet: f64,
    /// Price of one round: `bonus_buy_cost × bet`.
    pub round_cost: f64,
    pub total_won: f64,
    /// One entry per paying symbol, in paytable order.
    pub per_target: Vec<TargetStats>,
}

impl BonusReport {
    pub fn avg_win(&self) -> f64 {
        if self.rounds > 0 {
            self.total_won / self.rounds as f64
        } else {
            0.0
        }
    }

    pub fn rtp_percent(&self) -> f64 {
        if self.round_cost > 0.0 {
            self.avg_win() / self.round_cost * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregate result of the full pipeline: base spins plus every naturally
/// triggered bonus session played to completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub spins: u64,
    pub bet: f64,
    pub total_wagered: f64,
    pub base_won: f64,
    pub bonus_won: f64,
    pub hit_count: u64,
    pub trigger_count: u64,
}

impl FullReport {
    pub fn total_won(&self) -> f64 {
        self.base_won + self.bonus_won
    }

    pub fn rtp_percent(&self) -> f64 {
        if self.total_wagered > 0.0 {
            self.total_won() / self.total_wagered * 100.0
        } else {
            0.0
        }
    }

    pub fn trigger_rate(&self) -> f64 {
        if self.spins > 0 {
            self.trigger_count as f64 / self.spins as f64
        } else {
            0.0
        }
    }
}

/// Simulate base spins only.
pub fn run_base(config: &ReelConfig, opts: &SimOptions) -> EngineResult<BaseReport> {
    let mut engine = SlotEngine::new(config.clone(), opts.seed)?;
    let mut report = BaseReport {
        spins: opts.iterations,
        bet: opts.bet,
        total_wagered: 0.0,
        total_won: 0.0,
        hit_count: 0,
        trigger_count: 0,
    };
    for _ in 0..opts.iterations {
        let result = engine.spin(opts.bet)?;
        report.total_wagered += opts.bet;
        report.total_won += result.eval.total;
        if result.eval.is_win() {
            report.hit_count += 1;
        }
        if result.bonus_trigger.is_some() {
            report.trigger_count += 1;
        }
    }
    log::info!(
        "base sim: {} spins, rtp {:.2}%, hit rate {:.2}%",
        report.spins,
        report.rtp_percent(),
        report.hit_rate() * 100.0
    );
    Ok(report)
}

/// Simulate bought bonus rounds.
pub fn run_bonus(config: &ReelConfig, opts: &SimOptions) -> EngineResult<BonusReport> {
    let mut engine = SlotEngine::new(config.clone(), opts.seed)?;
    let mut per_target: Vec<TargetStats> = Symbol::PAYING
        .iter()
        .map(|&symbol| TargetStats {
            symbol,
            rounds: 0,
            total_won: 0.0,
        })
        .collect();
    let mut total_won = 0.0;

    for _ in 0..opts.iterations {
        let target = engine.buy_bonus(opts.bet)?;
        let round_won = play_out_session(&mut engine)?;
        total_won += round_won;
        if let Some(stats) = per_target.iter_mut().find(|s| s.symbol == target) {
            stats.rounds += 1;
            stats.total_won += round_won;
        }
    }

    let report = BonusReport {
        rounds: opts.iterations,
        bet: opts.bet,
        round_cost: config.bonus_buy_cost * opts.bet,
        total_won,
        per_target,
    };
    log::info!(
        "bonus sim: {} rounds, avg win {:.2}, rtp {:.2}%",
        report.rounds,
        report.avg_win(),
        report.rtp_percent()
    );
    Ok(report)
}

/// Simulate the full pipeline: every natural trigger runs its session to
/// completion before the next base spin.
pub fn run_full(config: &ReelConfig, opts: &SimOptions) -> EngineResult<FullReport> {
    let mut engine = SlotEngine::new(config.clone(), opts.seed)?;
    let mut report = FullReport {
        spins: opts.iterations,
        bet: opts.bet,
        total_wagered: 0.0,
        base_won: 0.0,
        bonus_won: 0.0,
        hit_count: 0,
        trigger_count: 0,
    };
    for _ in 0..opts.iterations {
        let result = engine.spin(opts.bet)?;
        report.total_wagered += opts.bet;
        report.base_won += result.eval.total;
        if result.eval.is_win() {
            report.hit_count += 1;
        }
        if let Some(target) = result.bonus_trigger {
            report.trigger_count += 1;
            engine.start_bonus(target, opts.bet)?;
            report.bonus_won += play_out_session(&mut engine)?;
        }
    }
    log::info!(
        "full sim: {} spins, rtp {:.2}%, trigger rate {:.4}%",
        report.spins,
        report.rtp_percent(),
        report.trigger_rate() * 100.0
    );
    Ok(report)
}

/// Drive the active session to its end, returning the session total.
fn play_out_session(engine: &mut SlotEngine) -> EngineResult<f64> {
    let mut session_total = 0.0;
    while engine.bonus_active() {
        session_total = engine.bonus_spin()?.session_total;
    }
    Ok(session_total)
}
