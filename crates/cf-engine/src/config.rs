//! Engine configuration
//!
//! An immutable snapshot of everything the math model fixes: the per-mode
//! symbol weight tables, the cluster paytable, wild-spawn probabilities,
//! scatter awards, multiplier trails, bet-plus modifiers, and the max-win
//! cap. A config is validated once at construction; rounds never mutate it
//! and may share it by reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::GameRng;
use crate::symbols::Symbol;

/// Smallest cluster that pays
pub const MIN_CLUSTER_SIZE: usize = 5;
/// Cluster sizes above this clamp to the top paytable row
pub const MAX_PAY_CLUSTER_SIZE: usize = 15;
/// Number of paytable rows per symbol (sizes 5..=15)
pub const PAY_SIZES: usize = MAX_PAY_CLUSTER_SIZE - MIN_CLUSTER_SIZE + 1;

/// A weight table mapping drawable symbols to positive weights
///
/// Entry order is the draw-scan order and stays fixed (catalog order), so
/// a seeded stream resolves identically across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    symbols: Vec<Symbol>,
    weights: Vec<f64>,
}

impl WeightTable {
    pub fn new(entries: &[(Symbol, f64)]) -> Self {
        Self {
            symbols: entries.iter().map(|(s, _)| *s).collect(),
            weights: entries.iter().map(|(_, w)| *w).collect(),
        }
    }

    /// Draw one symbol
    pub fn draw(&self, rng: &mut GameRng) -> Symbol {
        self.symbols[rng.weighted(&self.weights)]
    }

    pub fn weight_of(&self, symbol: Symbol) -> Option<f64> {
        self.symbols
            .iter()
            .position(|&s| s == symbol)
            .map(|i| self.weights[i])
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Copy of the table with one symbol's weight scaled
    pub fn boosted(&self, symbol: Symbol, factor: f64) -> Self {
        let mut boosted = self.clone();
        if let Some(i) = boosted.symbols.iter().position(|&s| s == symbol) {
            boosted.weights[i] *= factor;
        }
        boosted
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (&symbol, &weight) in self.symbols.iter().zip(&self.weights) {
            if symbol.is_empty() {
                return Err(ConfigError::UnknownSymbol(symbol));
            }
            if weight <= 0.0 {
                return Err(ConfigError::NonPositiveWeight(symbol, weight));
            }
        }
        Ok(())
    }
}

/// Cluster paytable: base-bet multiples per symbol and clamped size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paytable {
    pays: BTreeMap<Symbol, [f64; PAY_SIZES]>,
}

impl Paytable {
    pub fn new(pays: BTreeMap<Symbol, [f64; PAY_SIZES]>) -> Self {
        Self { pays }
    }

    /// Payout multiple for a cluster; sizes above 15 clamp to the top row
    pub fn payout(&self, symbol: Symbol, size: usize) -> f64 {
        let size = size.clamp(MIN_CLUSTER_SIZE, MAX_PAY_CLUSTER_SIZE);
        self.pays
            .get(&symbol)
            .map(|row| row[size - MIN_CLUSTER_SIZE])
            .unwrap_or(0.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for symbol in Symbol::PAYING {
            let row = self
                .pays
                .get(&symbol)
                .ok_or(ConfigError::MissingPaytableEntry(symbol))?;
            for (i, pair) in row.windows(2).enumerate() {
                if pair[1] < pair[0] {
                    return Err(ConfigError::NonMonotonicPaytable {
                        symbol,
                        size: MIN_CLUSTER_SIZE + i + 1,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Post-win wild spawn distribution; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WildSpawnWeights {
    pub wild: f64,
    pub e_wild: f64,
}

impl WildSpawnWeights {
    /// Draw order for the spawner: plain wild first, then the exploder
    pub const SYMBOLS: [Symbol; 2] = [Symbol::Wild, Symbol::EWild];

    pub fn as_weights(&self) -> [f64; 2] {
        [self.wild, self.e_wild]
    }
}

/// Free-spin awards for scatter counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterAwards {
    /// Spins for the minimum entry trigger (3 scatters)
    pub entry_base: u32,
    /// Extra spins per scatter beyond 3
    pub entry_per_extra: u32,
    /// Retrigger spins for 2, 3, 4 scatters
    pub retrigger: [u32; 3],
    /// Extra retrigger spins per scatter beyond 4
    pub retrigger_per_extra: u32,
}

impl ScatterAwards {
    /// Spins awarded on entry from the base game (3 → 10, 4 → 12, 5+ → +2 each)
    pub fn entry_spins(&self, scatters: u8) -> u32 {
        debug_assert!(scatters >= 3);
        self.entry_base + u32::from(scatters.saturating_sub(3)) * self.entry_per_extra
    }

    /// Spins awarded on a retrigger (2 → 3, 3 → 5, 4 → 7, 5+ → +2 each)
    pub fn retrigger_spins(&self, scatters: u8) -> u32 {
        debug_assert!(scatters >= 2);
        match scatters {
            2..=4 => self.retrigger[scatters as usize - 2],
            _ => self.retrigger[2] + u32::from(scatters - 4) * self.retrigger_per_extra,
        }
    }
}

/// Bet-plus option selected per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetPlus {
    #[default]
    Off,
    /// 1.5× bet: boosted scatter weight
    X1_5,
    /// 2× bet: boosted explosivo-wild weight
    X2,
    /// 3× bet: both boosts
    X3,
}

impl BetPlus {
    /// Cost multiple on the base bet (debited by the driver)
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            BetPlus::Off => 1.0,
            BetPlus::X1_5 => 1.5,
            BetPlus::X2 => 2.0,
            BetPlus::X3 => 3.0,
        }
    }
}

/// Weight boosts the bet-plus tiers apply to the base-game table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetPlusModifiers {
    pub scatter_boost: f64,
    pub ew_boost: f64,
}

impl Default for BetPlusModifiers {
    fn default() -> Self {
        Self {
            scatter_boost: 2.0,
            ew_boost: 2.0,
        }
    }
}

/// Complete, immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Base-game symbol weights
    pub weights_base_game: WeightTable,
    /// Free-spins symbol weights (wild ×1.5, explosivo ×2 vs base)
    pub weights_free_spins: WeightTable,
    /// Cluster paytable
    pub paytable: Paytable,
    /// Round win cap as a multiple of the base bet
    pub max_win_multiple: f64,
    /// Post-win spawn distribution
    pub wild_spawn: WildSpawnWeights,
    /// Entry and retrigger spin awards
    pub scatter_awards: ScatterAwards,
    /// Base-game multiplier trail
    pub base_game_trail: [u32; 6],
    /// Free-spins base levels; the active trail is six doublings of one level
    pub free_spins_base_levels: [u32; 6],
    /// Ceiling on any free-spins trail entry
    pub free_spins_multiplier_cap: u32,
    /// Bet-plus weight boosts
    pub bet_plus: BetPlusModifiers,
    /// Feature-buy price as a multiple of the base bet
    pub feature_buy_cost: f64,
    /// Target return-to-player, percent (informational)
    pub target_rtp: f64,
}

impl GameConfig {
    /// The production math model
    pub fn standard() -> Self {
        let weights_base_game = WeightTable::new(&[
            (Symbol::Lady, 3.0),
            (Symbol::Pink, 14.0),
            (Symbol::Green, 16.0),
            (Symbol::Blue, 18.0),
            (Symbol::Orange, 20.0),
            (Symbol::Cyan, 22.0),
            (Symbol::Wild, 12.0),
            (Symbol::EWild, 8.0),
            (Symbol::Scatter, 7.0),
        ]);
        // Wild ×1.5 and explosivo ×2 vs base; low pays and scatter trimmed
        // to keep the table balanced.
        let weights_free_spins = WeightTable::new(&[
            (Symbol::Lady, 3.0),
            (Symbol::Pink, 13.0),
            (Symbol::Green, 15.0),
            (Symbol::Blue, 16.0),
            (Symbol::Orange, 18.0),
            (Symbol::Cyan, 20.0),
            (Symbol::Wild, 18.0),
            (Symbol::EWild, 16.0),
            (Symbol::Scatter, 5.0),
        ]);

        let mut pays = BTreeMap::new();
        pays.insert(
            Symbol::Lady,
            [2.0, 3.0, 5.0, 10.0, 15.0, 25.0, 50.0, 100.0, 150.0, 200.0, 250.0],
        );
        pays.insert(
            Symbol::Pink,
            [1.0, 1.5, 2.5, 5.0, 7.5, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
        );
        pays.insert(
            Symbol::Green,
            [0.8, 1.2, 2.0, 4.0, 6.0, 8.0, 15.0, 25.0, 30.0, 40.0, 50.0],
        );
        pays.insert(
            Symbol::Blue,
            [0.5, 1.0, 1.5, 3.0, 5.0, 6.0, 10.0, 15.0, 20.0, 25.0, 30.0],
        );
        pays.insert(
            Symbol::Orange,
            [0.4, 0.8, 1.2, 2.0, 3.0, 5.0, 8.0, 12.0, 15.0, 20.0, 25.0],
        );
        pays.insert(
            Symbol::Cyan,
            [0.3, 0.5, 1.0, 1.5, 2.0, 4.0, 6.0, 10.0, 12.0, 15.0, 20.0],
        );

        Self {
            weights_base_game,
            weights_free_spins,
            paytable: Paytable::new(pays),
            max_win_multiple: 7500.0,
            wild_spawn: WildSpawnWeights {
                wild: 0.5,
                e_wild: 0.5,
            },
            scatter_awards: ScatterAwards {
                entry_base: 10,
                entry_per_extra: 2,
                retrigger: [3, 5, 7],
                retrigger_per_extra: 2,
            },
            base_game_trail: [1, 2, 4, 8, 16, 32],
            free_spins_base_levels: [1, 2, 4, 8, 16, 32],
            free_spins_multiplier_cap: 1024,
            bet_plus: BetPlusModifiers::default(),
            feature_buy_cost: 75.0,
            target_rtp: 96.1,
        }
    }

    /// Validate the snapshot; fatal before any round runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights_base_game.validate()?;
        self.weights_free_spins.validate()?;

        for &symbol in self.weights_base_game.symbols() {
            if self.weights_free_spins.weight_of(symbol).is_none() {
                return Err(ConfigError::WeightSetMismatch(symbol));
            }
        }
        for &symbol in self.weights_free_spins.symbols() {
            if self.weights_base_game.weight_of(symbol).is_none() {
                return Err(ConfigError::WeightSetMismatch(symbol));
            }
        }

        let spawn_sum = self.wild_spawn.wild + self.wild_spawn.e_wild;
        if (spawn_sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::SpawnProbabilitySum(spawn_sum));
        }

        self.paytable.validate()
    }

    /// Base-game weights with the round's bet-plus boosts applied
    pub fn effective_base_weights(&self, bet_plus: BetPlus) -> WeightTable {
        match bet_plus {
            BetPlus::Off => self.weights_base_game.clone(),
            BetPlus::X1_5 => self
                .weights_base_game
                .boosted(Symbol::Scatter, self.bet_plus.scatter_boost),
            BetPlus::X2 => self
                .weights_base_game
                .boosted(Symbol::EWild, self.bet_plus.ew_boost),
            BetPlus::X3 => self
                .weights_base_game
                .boosted(Symbol::Scatter, self.bet_plus.scatter_boost)
                .boosted(Symbol::EWild, self.bet_plus.ew_boost),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
