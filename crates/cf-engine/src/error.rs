//! Engine error types

use thiserror::Error;

use crate::symbols::Symbol;

/// Fatal configuration problems, detected at construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight tables disagree on symbol {0}: present in one mode only")]
    WeightSetMismatch(Symbol),

    #[error("weight for {0} must be positive, got {1}")]
    NonPositiveWeight(Symbol, f64),

    #[error("{0} is not a drawable symbol")]
    UnknownSymbol(Symbol),

    #[error("wild spawn probabilities must sum to 1.0, got {0}")]
    SpawnProbabilitySum(f64),

    #[error("paytable for {symbol} decreases at cluster size {size}")]
    NonMonotonicPaytable { symbol: Symbol, size: usize },

    #[error("paytable has no entry for paying symbol {0}")]
    MissingPaytableEntry(Symbol),
}

/// Per-round option problems, surfaced to the caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundOptionError {
    #[error("base bet must be positive, got {0}")]
    NonPositiveBet(f64),

    #[error("bet-plus modifiers cannot be combined with feature buy")]
    ModifierWithFeatureBuy,
}
