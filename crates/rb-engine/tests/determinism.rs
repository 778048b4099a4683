//! Cross-instance reproducibility: two engines built from the same seed
//! and driven through the same call sequence must produce byte-identical
//! serialized results.

use rb_engine::{ReelConfig, SlotEngine};

fn transcript(seed: u32, spins: u32) -> String {
    let mut engine = SlotEngine::new(ReelConfig::standard(), seed).expect("valid config");
    let mut out = String::new();
    for _ in 0..spins {
        let result = engine.spin(1.0).expect("base spin");
        out.push_str(&serde_json::to_string(&result).expect("serialize spin"));
        out.push('\n');
        if let Some(target) = result.bonus_trigger {
            engine.start_bonus(target, 1.0).expect("start session");
            while engine.bonus_active() {
                let bonus = engine.bonus_spin().expect("bonus spin");
                out.push_str(&serde_json::to_string(&bonus).expect("serialize bonus"));
                out.push('\n');
            }
        }
    }
    out.push_str(&serde_json::to_string(engine.stats()).expect("serialize stats"));
    out
}

#[test]
fn same_seed_yields_byte_identical_transcripts() {
    assert_eq!(transcript(20_250_828, 2_000), transcript(20_250_828, 2_000));
}

#[test]
fn different_seeds_yield_different_transcripts() {
    assert_ne!(transcript(1, 500), transcript(2, 500));
}

#[test]
fn reseeding_replays_the_stream() {
    let mut engine = SlotEngine::new(ReelConfig::standard(), 42).expect("valid config");
    let first = engine.spin(1.0).expect("spin");
    engine.reseed(42);
    let replay = engine.spin(1.0).expect("spin");
    assert_eq!(first, replay);
}
