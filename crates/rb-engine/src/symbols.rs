//! Symbol definitions and per-symbol weight tables

use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;

/// A grid symbol: ten paying fruits plus the two special markers.
///
/// `Scatter` triggers the bonus feature at three or more anywhere on the
/// grid. `Mystery` only ever exists pre-reveal; it is substituted with a
/// paying symbol before any evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Cherry,
    Lemon,
    Grape,
    Orange,
    Kiwi,
    Coconut,
    Bell,
    Star,
    Diamond,
    Clover,
    Scatter,
    Mystery,
}

impl Symbol {
    /// All paying symbols, in paytable order (lowest tier first).
    pub const PAYING: [Symbol; 10] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Grape,
        Symbol::Orange,
        Symbol::Kiwi,
        Symbol::Coconut,
        Symbol::Bell,
        Symbol::Star,
        Symbol::Diamond,
        Symbol::Clover,
    ];

    /// Number of paying symbols.
    pub const PAYING_COUNT: usize = 10;

    /// Dense index into paying-symbol tables, `None` for specials.
    #[inline]
    pub fn paying_index(self) -> Option<usize> {
        match self {
            Symbol::Cherry => Some(0),
            Symbol::Lemon => Some(1),
            Symbol::Grape => Some(2),
            Symbol::Orange => Some(3),
            Symbol::Kiwi => Some(4),
            Symbol::Coconut => Some(5),
            Symbol::Bell => Some(6),
            Symbol::Star => Some(7),
            Symbol::Diamond => Some(8),
            Symbol::Clover => Some(9),
            Symbol::Scatter | Symbol::Mystery => None,
        }
    }

    /// Whether this symbol pays in the ways evaluation.
    #[inline]
    pub fn is_paying(self) -> bool {
        self.paying_index().is_some()
    }

    #[inline]
    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    #[inline]
    pub fn is_mystery(self) -> bool {
        self == Symbol::Mystery
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "Cherry",
            Symbol::Lemon => "Lemon",
            Symbol::Grape => "Grape",
            Symbol::Orange => "Orange",
            Symbol::Kiwi => "Kiwi",
            Symbol::Coconut => "Coconut",
            Symbol::Bell => "Bell",
            Symbol::Star => "Star",
            Symbol::Diamond => "Diamond",
            Symbol::Clover => "Clover",
            Symbol::Scatter => "Scatter",
            Symbol::Mystery => "Mystery",
        }
    }

    /// Single-cell glyph for terminal rendering.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Grape => "🍇",
            Symbol::Orange => "🍊",
            Symbol::Kiwi => "🥝",
            Symbol::Coconut => "🥥",
            Symbol::Bell => "🔔",
            Symbol::Star => "⭐",
            Symbol::Diamond => "💎",
            Symbol::Clover => "🍀",
            Symbol::Scatter => "🎟️",
            Symbol::Mystery => "❓",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A weight per paying symbol, used for reveal tables and target selection.
///
/// Stored as a fixed array indexed in [`Symbol::PAYING`] order so the
/// closed symbol set is checked at compile time instead of through dynamic
/// key lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolWeights([f64; Symbol::PAYING_COUNT]);

impl SymbolWeights {
    /// Build from weights given in [`Symbol::PAYING`] order.
    pub fn new(weights: [f64; Symbol::PAYING_COUNT]) -> Self {
        Self(weights)
    }

    /// All-zero table, for accumulation.
    pub fn zero() -> Self {
        Self([0.0; Symbol::PAYING_COUNT])
    }

    /// Weight for a symbol; specials weigh nothing.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> f64 {
        symbol.paying_index().map(|i| self.0[i]).unwrap_or(0.0)
    }

    /// Add to a symbol's weight. No-op for specials.
    pub fn add(&mut self, symbol: Symbol, amount: f64) {
        if let Some(i) = symbol.paying_index() {
            self.0[i] += amount;
        }
    }

    /// Multiply a symbol's weight by a factor. No-op for specials.
    pub fn scale(&mut self, symbol: Symbol, factor: f64) {
        if let Some(i) = symbol.paying_index() {
            self.0[i] *= factor;
        }
    }

    /// Total weight across all paying symbols.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Draw one paying symbol by cumulative walk. Consumes one rng draw;
    /// falls back to the last paying symbol if floating point error leaves
    /// the draw unconsumed.
    pub fn sample(&self, rng: &mut SeededRng) -> Symbol {
        let r = rng.next_f64() * self.total();
        let mut acc = 0.0;
        for (i, &symbol) in Symbol::PAYING.iter().enumerate() {
            acc += self.0[i];
            if r < acc {
                return symbol;
            }
        }
        Symbol::Clover
    }
}
