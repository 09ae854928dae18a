//! Round engine — the cascade state machine
//!
//! Drives one paid spin (and any free-spins session it triggers) through
//! the cascade loop:
//!
//! ```text
//! REEL_DROP → CHECK_SCATTERS → CHECK_CLUSTERS ──┬─ clusters ──→ PROCESS_WINS ─┐
//!      ▲                                        └─ none ──→ CHECK_EXPLOSIONS  │
//!      │                                                        │       │     │
//!      └── explosions / wins refill ◄───────────────────────────┘       ▼     │
//!                                                            SEQUENCE_COMPLETE│
//!      ◄───────────────────────────────────────────────────────────────────── ┘
//! ```
//!
//! The engine borrows an immutable `GameConfig` and a seeded `GameRng`;
//! all per-round state is owned here and discarded on return.

use serde::{Deserialize, Serialize};

use crate::cluster::{Cluster, find_clusters};
use crate::config::{BetPlus, GameConfig, WeightTable};
use crate::error::RoundOptionError;
use crate::explosion::ExplosionEngine;
use crate::free_spins::FreeSpinsState;
use crate::grid::{Grid, Position};
use crate::multiplier::MultiplierTrail;
use crate::rng::GameRng;
use crate::scenario::DropScript;
use crate::spawner::spawn_wilds;
use crate::spin::{CascadeStep, ClusterWin, FreeSpinsSummary, RoundResult, SpinRecord};
use crate::symbols::Symbol;

/// Scatters needed to enter free spins from the base game
const ENTRY_SCATTERS: u8 = 3;
/// Scatters needed for a retrigger inside free spins
const RETRIGGER_SCATTERS: u8 = 2;

/// How a round is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    BaseGame,
    /// Straight into free spins; the buy cost is debited by the driver
    FeatureBuy,
}

/// Per-round options supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOptions {
    pub mode: GameMode,
    pub base_bet: f64,
    pub bet_plus: BetPlus,
}

impl RoundOptions {
    pub fn base_game(base_bet: f64) -> Self {
        Self {
            mode: GameMode::BaseGame,
            base_bet,
            bet_plus: BetPlus::Off,
        }
    }

    pub fn feature_buy(base_bet: f64) -> Self {
        Self {
            mode: GameMode::FeatureBuy,
            base_bet,
            bet_plus: BetPlus::Off,
        }
    }

    pub fn with_bet_plus(mut self, bet_plus: BetPlus) -> Self {
        self.bet_plus = bet_plus;
        self
    }

    pub fn validate(&self) -> Result<(), RoundOptionError> {
        if self.base_bet <= 0.0 {
            return Err(RoundOptionError::NonPositiveBet(self.base_bet));
        }
        if self.mode == GameMode::FeatureBuy && self.bet_plus != BetPlus::Off {
            return Err(RoundOptionError::ModifierWithFeatureBuy);
        }
        Ok(())
    }
}

/// Cascade state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpinPhase {
    ReelDrop,
    CheckScatters,
    CheckClusters,
    ProcessWins,
    CheckExplosions,
    SequenceComplete,
}

struct SpinOutcome {
    record: SpinRecord,
    capped: bool,
}

/// Session statistics accumulated across rounds by a driver
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineStats {
    pub total_rounds: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub free_spin_sessions: u64,
    pub max_win_ratio: f64,
}

impl EngineStats {
    /// Return-to-player so far, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Share of rounds that paid anything, percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_rounds > 0 {
            (self.wins as f64 / self.total_rounds as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn record(&mut self, result: &RoundResult) {
        self.total_rounds += 1;
        self.total_bet += result.bet;
        self.total_win += result.total_win;
        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if result.free_spins.is_some() {
            self.free_spin_sessions += 1;
        }
        if result.win_ratio() > self.max_win_ratio {
            self.max_win_ratio = result.win_ratio();
        }
    }
}

/// Simulates paid rounds against a borrowed config and random stream
pub struct RoundEngine<'a> {
    config: &'a GameConfig,
    rng: &'a mut GameRng,
    script: Option<DropScript>,
}

impl<'a> RoundEngine<'a> {
    /// The config must have passed [`GameConfig::validate`] already.
    pub fn new(config: &'a GameConfig, rng: &'a mut GameRng) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            config,
            rng,
            script: None,
        }
    }

    /// Engine whose reel drops are fed by a script first (fixtures, demos)
    pub fn with_script(config: &'a GameConfig, rng: &'a mut GameRng, script: DropScript) -> Self {
        let mut engine = Self::new(config, rng);
        engine.script = Some(script);
        engine
    }

    /// Play one paid round to completion
    pub fn play(&mut self, options: &RoundOptions) -> Result<RoundResult, RoundOptionError> {
        options.validate()?;
        let config = self.config;
        let bet = options.base_bet;
        let cap = config.max_win_multiple * bet;
        let mut exploder = ExplosionEngine::new();

        let (base_game, base_capped) = match options.mode {
            GameMode::BaseGame => {
                let weights = config.effective_base_weights(options.bet_plus);
                let mut trail = MultiplierTrail::new(config.base_game_trail);
                let outcome = self.run_spin(
                    &weights,
                    &mut trail,
                    bet,
                    0.0,
                    cap,
                    ENTRY_SCATTERS,
                    &mut exploder,
                );
                (Some(outcome.record), outcome.capped)
            }
            GameMode::FeatureBuy => (None, false),
        };

        let base_win = base_game.as_ref().map(|r| r.win).unwrap_or(0.0);
        let scatters = base_game.as_ref().map(|r| r.scatters).unwrap_or(0);

        let mut max_win_hit = base_capped;
        let mut free_spins = None;

        let enters_session = !base_capped
            && (options.mode == GameMode::FeatureBuy || scatters >= ENTRY_SCATTERS);
        if enters_session {
            let state = match options.mode {
                GameMode::FeatureBuy => FreeSpinsState::feature_buy(&config.scatter_awards),
                GameMode::BaseGame => {
                    FreeSpinsState::from_scatters(&config.scatter_awards, scatters)
                }
            };
            let (summary, session_capped) =
                self.run_free_spins(state, bet, base_win, cap, &mut exploder);
            max_win_hit |= session_capped;
            free_spins = Some(summary);
        }

        let session_win = free_spins.as_ref().map(|s| s.session_win).unwrap_or(0.0);
        let total_win = (base_win + session_win).min(cap);
        let multiplier_progression = base_game
            .as_ref()
            .map(|r| r.multiplier_progression())
            .unwrap_or_default();

        log::debug!(
            "[RoundEngine::play] win {:.2} ({}x bet), max_win_hit={}",
            total_win,
            total_win / bet,
            max_win_hit
        );

        Ok(RoundResult {
            total_win,
            bet,
            base_game,
            free_spins,
            multiplier_progression,
            max_win_hit,
        })
    }

    /// Run one spin's cascade loop
    #[allow(clippy::too_many_arguments)]
    fn run_spin(
        &mut self,
        weights: &WeightTable,
        trail: &mut MultiplierTrail,
        bet: f64,
        win_before: f64,
        cap: f64,
        scatter_trigger: u8,
        exploder: &mut ExplosionEngine,
    ) -> SpinOutcome {
        let mut grid = Grid::empty();
        let mut record = SpinRecord::default();
        let collected_before = exploder.collected_total();
        let mut latched: Option<u8> = None;
        let mut capped = false;
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut phase = SpinPhase::ReelDrop;

        while phase != SpinPhase::SequenceComplete {
            match phase {
                SpinPhase::ReelDrop => {
                    exploder.clear_spawned();
                    self.drop_symbols(&mut grid, weights);
                    exploder.track_landed(&grid);
                    phase = SpinPhase::CheckScatters;
                }
                SpinPhase::CheckScatters => {
                    // The scatters responsible for a trigger are the ones on
                    // the first drop whose count reached the threshold; they
                    // are not re-counted later in the run.
                    if latched.is_none() {
                        let seen = grid.count(Symbol::Scatter) as u8;
                        if seen >= scatter_trigger {
                            log::debug!("[RoundEngine::run_spin] latched {seen} scatters");
                            latched = Some(seen);
                        }
                    }
                    phase = SpinPhase::CheckClusters;
                }
                SpinPhase::CheckClusters => {
                    clusters = find_clusters(&grid);
                    phase = if clusters.is_empty() {
                        SpinPhase::CheckExplosions
                    } else {
                        SpinPhase::ProcessWins
                    };
                }
                SpinPhase::ProcessWins => {
                    let multiplier = trail.current();
                    let mut step_win = 0.0;
                    let mut wins = Vec::with_capacity(clusters.len());
                    for cluster in &clusters {
                        let win = self.config.paytable.payout(cluster.symbol, cluster.payout_size())
                            * multiplier as f64
                            * bet;
                        step_win += win;
                        wins.push(ClusterWin {
                            symbol: cluster.symbol,
                            size: cluster.size(),
                            positions: cluster.positions.clone(),
                            multiplier,
                            win,
                        });
                    }

                    if win_before + record.win + step_win >= cap {
                        // Truncate to the cap and end the round; every
                        // pending feature (including a latched free-spins
                        // entry) is cancelled.
                        step_win = (cap - win_before - record.win).max(0.0);
                        record.win += step_win;
                        latched = None;
                        capped = true;
                        record.steps.push(CascadeStep {
                            index: record.steps.len() as u32,
                            multiplier,
                            clusters: wins,
                            spawned: Vec::new(),
                            forfeited_spawns: 0,
                            explosion: None,
                            win: step_win,
                        });
                        phase = SpinPhase::SequenceComplete;
                        continue;
                    }
                    record.win += step_win;

                    exploder.track_cluster_ews(&clusters, &grid);
                    let removal: Vec<Position> = clusters
                        .iter()
                        .flat_map(|c| c.positions.iter().copied())
                        .collect();
                    grid.remove(&removal);

                    let spawn_outcome =
                        spawn_wilds(&mut grid, &clusters, &self.config.wild_spawn, self.rng);
                    for spawned in &spawn_outcome.spawned {
                        if spawned.symbol == Symbol::EWild {
                            exploder.track_spawned(spawned.position);
                        }
                    }
                    grid.apply_gravity();
                    trail.advance();

                    record.steps.push(CascadeStep {
                        index: record.steps.len() as u32,
                        multiplier,
                        clusters: wins,
                        spawned: spawn_outcome.spawned,
                        forfeited_spawns: spawn_outcome.forfeited,
                        explosion: None,
                        win: step_win,
                    });
                    phase = SpinPhase::CheckExplosions;
                }
                SpinPhase::CheckExplosions => {
                    if !exploder.should_check(!clusters.is_empty()) {
                        // A winning step leaves holes; the next drop fills them.
                        phase = SpinPhase::ReelDrop;
                        continue;
                    }
                    let fired = exploder.execute(&mut grid);
                    match fired {
                        Some(event) if !event.destroyed.is_empty() || event.collected > 0 => {
                            let multiplier = trail.current();
                            let destroyed_any = !event.destroyed.is_empty();
                            grid.apply_gravity();
                            if destroyed_any {
                                trail.advance();
                            }
                            record.steps.push(CascadeStep {
                                index: record.steps.len() as u32,
                                multiplier,
                                clusters: Vec::new(),
                                spawned: Vec::new(),
                                forfeited_spawns: 0,
                                explosion: Some(event),
                                win: 0.0,
                            });
                            phase = SpinPhase::ReelDrop;
                        }
                        _ => phase = SpinPhase::SequenceComplete,
                    }
                }
                SpinPhase::SequenceComplete => unreachable!(),
            }
        }

        exploder.reset_cascade_state();
        record.scatters = latched.unwrap_or(0);
        record.ew_collected = (exploder.collected_total() - collected_before) as u32;
        SpinOutcome { record, capped }
    }

    /// Run a free-spins session until its spin budget (plus anything
    /// retriggers and upgrades add) is exhausted or the cap is hit
    fn run_free_spins(
        &mut self,
        mut state: FreeSpinsState,
        bet: f64,
        carryover: f64,
        cap: f64,
        exploder: &mut ExplosionEngine,
    ) -> (FreeSpinsSummary, bool) {
        let config = self.config;
        let mut spins: Vec<SpinRecord> = Vec::new();
        let mut capped = false;

        log::debug!(
            "[RoundEngine::run_free_spins] entering with {} spins",
            state.spins_remaining
        );

        while state.has_next_spin() && !capped {
            state.apply_pending_upgrades();
            let base_level = state.base_level(&config.free_spins_base_levels);
            let mut trail =
                MultiplierTrail::from_base_level(base_level, config.free_spins_multiplier_cap);

            let outcome = self.run_spin(
                &config.weights_free_spins,
                &mut trail,
                bet,
                carryover + state.session_win,
                cap,
                RETRIGGER_SCATTERS,
                exploder,
            );

            state.session_win += outcome.record.win;
            state.collect_ews(outcome.record.ew_collected);
            state.spins_played += 1;
            state.spins_remaining = state.spins_remaining.saturating_sub(1);

            if outcome.record.scatters >= RETRIGGER_SCATTERS {
                let award = config.scatter_awards.retrigger_spins(outcome.record.scatters);
                log::debug!(
                    "[RoundEngine::run_free_spins] retrigger: {} scatters award {award} spins",
                    outcome.record.scatters
                );
                state.retrigger(award);
            }

            if outcome.capped {
                capped = true;
                state.cancel_pending();
            }
            spins.push(outcome.record);
        }

        let summary = FreeSpinsSummary {
            spins_played: state.spins_played,
            total_awarded: state.total_awarded,
            retriggers: state.retriggers,
            session_win: state.session_win,
            ew_collected: state.ew_collected_total,
            upgrades_granted: state.upgrades_granted,
            final_base_level: state.base_level(&config.free_spins_base_levels),
            spins,
        };
        (summary, capped)
    }

    /// Fill every empty cell, script first, weighted draw otherwise
    fn drop_symbols(&mut self, grid: &mut Grid, weights: &WeightTable) {
        if let Some(script) = self.script.as_mut() {
            script.begin_drop();
        }
        for pos in Grid::positions() {
            if grid.symbol_at(pos).is_empty() {
                let symbol = match self.script.as_mut().and_then(DropScript::next_symbol) {
                    Some(scripted) => scripted,
                    None => weights.draw(self.rng),
                };
                grid.set(pos, symbol);
            }
        }
        debug_assert!(grid.is_full());
    }
}
