//! reelburst — command-line host for the slot engine.
//!
//! Drives interactive-style spins (including triggered bonus sessions) and
//! the three batch simulation modes, printing simulation reports as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};

use rb_engine::{BaseSpinResult, BonusSpinResult, Grid, ReelConfig, SlotEngine};
use rb_sim::SimOptions;

#[derive(Parser)]
#[command(name = "reelburst", about = "Deterministic slot engine driver", version)]
struct Cli {
    /// Bet per spin.
    #[arg(long, default_value_t = 1.0)]
    bet: f64,

    /// Seed for the rng stream.
    #[arg(long, default_value_t = 20_250_828)]
    seed: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run base spins, playing out any triggered bonus session.
    Spin {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Batch-simulate the base game.
    Base {
        #[arg(long, default_value_t = 200_000)]
        spins: u64,
    },
    /// Batch-simulate bought bonus rounds.
    Bonus {
        #[arg(long, default_value_t = 10_000)]
        rounds: u64,
    },
    /// Batch-simulate the full base-plus-bonus pipeline.
    Full {
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = ReelConfig::standard();
    let (bet, seed) = (cli.bet, cli.seed);

    match cli.command {
        Command::Spin { count } => run_spins(&config, seed, bet, count),
        Command::Base { spins } => {
            let report = rb_sim::run_base(&config, &options(spins, bet, seed))?;
            print_json(&report)
        }
        Command::Bonus { rounds } => {
            let report = rb_sim::run_bonus(&config, &options(rounds, bet, seed))?;
            print_json(&report)
        }
        Command::Full { spins } => {
            let report = rb_sim::run_full(&config, &options(spins, bet, seed))?;
            print_json(&report)
        }
    }
}

fn options(iterations: u64, bet: f64, seed: u32) -> SimOptions {
    SimOptions {
        iterations,
        bet,
        seed,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialize report")?
    );
    Ok(())
}

fn run_spins(config: &ReelConfig, seed: u32, bet: f64, count: u32) -> anyhow::Result<()> {
    let mut engine = SlotEngine::new(config.clone(), seed).context("build engine")?;

    for i in 1..=count {
        let result = engine.spin(bet).context("base spin")?;
        print_base_spin(i, &result);

        if let Some(target) = result.bonus_trigger {
            println!("  bonus triggered! target: {} {}", target.glyph(), target);
            engine.start_bonus(target, bet).context("start bonus")?;
            while engine.bonus_active() {
                let bonus = engine.bonus_spin().context("bonus spin")?;
                print_bonus_spin(&bonus);
            }
        }
    }

    let stats = engine.stats();
    println!(
        "\n{} spins, wagered {:.2}, won {:.2} (rtp {:.1}%, hit rate {:.1}%)",
        stats.total_spins,
        stats.total_wagered,
        stats.total_won,
        stats.rtp(),
        stats.hit_rate() * 100.0
    );
    Ok(())
}

fn print_base_spin(index: u32, result: &BaseSpinResult) {
    println!("spin {index}");
    print_grid(&result.grid);
    if let Some(burst) = &result.burst {
        match burst.single_reveal {
            Some(symbol) => println!(
                "  mystery burst: {} cells, unified reveal {}",
                burst.cells.len(),
                symbol
            ),
            None => println!("  mystery burst: {} cells", burst.cells.len()),
        }
    }
    for part in &result.eval.parts {
        println!(
            "  {} ×{}: {} ways → {:.2}",
            part.symbol, part.length, part.ways, part.amount
        );
    }
    println!("  win {:.2}", result.eval.total);
}

fn print_bonus_spin(result: &BonusSpinResult) {
    println!(
        "  bonus {} — reveal {}, {} sticky, win {:.2}, total {:.2}",
        result.spin_index,
        result.reveal_symbol.glyph(),
        result.sticky.len(),
        result.eval.total,
        result.session_total
    );
    print_grid(&result.composite_grid);
}

fn print_grid(grid: &Grid) {
    for row in 0..rb_engine::ROWS {
        let line: Vec<&str> = (0..rb_engine::COLS)
            .map(|col| grid.get(row, col).glyph())
            .collect();
        println!("    {}", line.join(" "));
    }
}
