//! Round result types
//!
//! Everything a round produces is a plain serializable value: the driver
//! can persist, diff, or replay results without touching engine state.

use serde::{Deserialize, Serialize};

use crate::explosion::ExplosionEvent;
use crate::grid::Position;
use crate::spawner::SpawnedWild;
use crate::symbols::Symbol;

/// One paid cluster inside a cascade step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterWin {
    pub symbol: Symbol,
    pub size: usize,
    /// Footprint at detection time
    pub positions: Vec<Position>,
    /// Multiplier applied to this cluster
    pub multiplier: u32,
    /// Win in currency units (paytable × multiplier × bet)
    pub win: f64,
}

/// One cascade step: a winning step carries clusters and spawns, a
/// terminal-check step may carry an explosion instead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeStep {
    pub index: u32,
    /// Multiplier in effect when the step resolved
    pub multiplier: u32,
    pub clusters: Vec<ClusterWin>,
    pub spawned: Vec<SpawnedWild>,
    pub forfeited_spawns: u32,
    pub explosion: Option<ExplosionEvent>,
    /// Win contributed by this step
    pub win: f64,
}

impl CascadeStep {
    pub fn is_winning(&self) -> bool {
        !self.clusters.is_empty()
    }
}

/// The cascade run of one spin (base game or free spin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SpinRecord {
    pub steps: Vec<CascadeStep>,
    /// Total spin win in currency units
    pub win: f64,
    /// Latched scatter count (0 if the trigger threshold was never reached)
    pub scatters: u8,
    /// EWs collected during this spin (cluster removals and detonations)
    pub ew_collected: u32,
}

impl SpinRecord {
    /// Multiplier in effect at each recorded step
    pub fn multiplier_progression(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.multiplier).collect()
    }
}

/// Summary of a free-spins session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsSummary {
    pub spins_played: u32,
    /// Entry spins plus everything retriggers and upgrades added
    pub total_awarded: u32,
    pub retriggers: u32,
    /// Session win in currency units (excludes base-game carryover)
    pub session_win: f64,
    pub ew_collected: u64,
    /// Upgrades granted by collection (3 EWs each), applied or not
    pub upgrades_granted: u32,
    /// Final multiplier base level (1, 2, 4, 8, 16 or 32)
    pub final_base_level: u32,
    pub spins: Vec<SpinRecord>,
}

/// Structured outcome of one paid round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Total round win in currency units, capped at the max-win multiple
    pub total_win: f64,
    /// Base bet the round was played at
    pub bet: f64,
    /// Base-game cascade run (`None` for feature-buy rounds)
    pub base_game: Option<SpinRecord>,
    pub free_spins: Option<FreeSpinsSummary>,
    /// Multiplier in effect at each base-game cascade step
    pub multiplier_progression: Vec<u32>,
    pub max_win_hit: bool,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0.0 {
            self.total_win / self.bet
        } else {
            0.0
        }
    }
}
