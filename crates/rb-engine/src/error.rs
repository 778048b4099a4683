//! Error types for the slot engine

use thiserror::Error;

use crate::symbols::Symbol;

/// Which pool a configuration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Base-game reel pool.
    Base,
    /// Scatter-free variant of a base column, used by the scatter cap.
    BaseScatterFree,
    /// Bonus-game reel pool.
    Bonus,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolKind::Base => write!(f, "base"),
            PoolKind::BaseScatterFree => write!(f, "base (scatter-free)"),
            PoolKind::Bonus => write!(f, "bonus"),
        }
    }
}

/// Engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{pool} pool for column {column} is empty")]
    EmptyColumnPool { pool: PoolKind, column: usize },

    #[error("{pool} pool for column {column} has a negative weight for {symbol}")]
    NegativeWeight {
        pool: PoolKind,
        column: usize,
        symbol: Symbol,
    },

    #[error("{pool} pool for column {column} sums to zero weight")]
    ZeroPoolWeight { pool: PoolKind, column: usize },

    #[error("weight table `{table}` must have a positive total")]
    ZeroTableWeight { table: &'static str },

    #[error("bet must be positive, got {0}")]
    InvalidBet(f64),

    #[error("bonus target must be a paying symbol, got {0}")]
    InvalidTarget(Symbol),

    #[error("a bonus session is already active")]
    SessionActive,

    #[error("no active bonus session")]
    NoSession,

    #[error("invalid configuration JSON: {0}")]
    ConfigParse(String),
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
