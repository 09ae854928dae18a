//! Explosivo-wild tracking and 3×3 explosions
//!
//! Eligibility depends on how an explosivo wild (EW) arrived at its cell,
//! so the engine keeps three explicit position sets per cascade instead of
//! inferring state from the grid:
//!
//! - `landed_this_drop` — EWs placed by the most recent refill (recomputed
//!   at every drop, so a spawned EW that survives to the next refill
//!   becomes eligible there);
//! - `in_winning_clusters` — EWs removed as cluster members; their cells
//!   are already empty but the remembered positions still detonate;
//! - `spawned_this_cascade` — EWs written by the spawner this cascade,
//!   never eligible until a refill re-lands them.
//!
//! All eligible EWs fire simultaneously in one step: their 3×3 areas are
//! unioned, only low-pay symbols inside the union are destroyed, and no
//! chain reactions occur within the step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::grid::{Grid, Position};
use crate::symbols::Symbol;

/// Summary of one simultaneous detonation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionEvent {
    /// Cells the blast emanated from (live EWs and remembered cluster EWs)
    pub origins: Vec<Position>,
    /// Low-pay cells cleared by the blast
    pub destroyed: Vec<Position>,
    /// Live EWs consumed (and collected) by their own blast
    pub collected: u32,
}

/// Per-cascade EW bookkeeping plus the running collection count
#[derive(Debug, Clone, Default)]
pub struct ExplosionEngine {
    landed_this_drop: BTreeSet<Position>,
    in_winning_clusters: BTreeSet<Position>,
    spawned_this_cascade: BTreeSet<Position>,
    collected_total: u64,
}

impl ExplosionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the spawn marks; called at each refill boundary so previously
    /// spawned, still-live EWs can land
    pub fn clear_spawned(&mut self) {
        self.spawned_this_cascade.clear();
    }

    /// Record the EWs sitting on the grid after a refill
    pub fn track_landed(&mut self, grid: &Grid) {
        self.landed_this_drop = grid
            .positions_of(Symbol::EWild)
            .into_iter()
            .filter(|p| !self.spawned_this_cascade.contains(p))
            .collect();
        debug_assert!(
            self.landed_this_drop
                .intersection(&self.spawned_this_cascade)
                .next()
                .is_none()
        );
    }

    /// Record EWs inside winning clusters before removal; each counts as
    /// one collection. Returns how many were newly collected.
    pub fn track_cluster_ews(&mut self, clusters: &[Cluster], grid: &Grid) -> u32 {
        let mut newly = 0u32;
        for cluster in clusters {
            for &pos in &cluster.positions {
                if grid.symbol_at(pos) == Symbol::EWild && self.in_winning_clusters.insert(pos) {
                    newly += 1;
                }
            }
        }
        self.collected_total += u64::from(newly);
        newly
    }

    /// Mark a freshly spawned EW as ineligible for this cascade
    pub fn track_spawned(&mut self, position: Position) {
        self.spawned_this_cascade.insert(position);
    }

    /// Explosions run only on steps where detection found nothing
    pub fn should_check(&self, clusters_found: bool) -> bool {
        !clusters_found
    }

    /// Fire every eligible EW simultaneously
    ///
    /// Live eligible EWs are consumed by their own blast and count as
    /// collected; remembered cluster EWs were collected at removal time and
    /// only contribute their blast area. Returns `None` when nothing was
    /// eligible.
    pub fn execute(&mut self, grid: &mut Grid) -> Option<ExplosionEvent> {
        let live: Vec<Position> = self
            .landed_this_drop
            .iter()
            .copied()
            .filter(|&p| {
                grid.symbol_at(p) == Symbol::EWild && !self.spawned_this_cascade.contains(&p)
            })
            .collect();

        let origins: BTreeSet<Position> = live
            .iter()
            .copied()
            .chain(self.in_winning_clusters.iter().copied())
            .collect();
        if origins.is_empty() {
            return None;
        }

        let blast: BTreeSet<Position> = origins.iter().flat_map(|p| p.area_3x3()).collect();
        let destroyed: Vec<Position> = blast
            .into_iter()
            .filter(|&p| grid.symbol_at(p).is_low_pay())
            .collect();
        for &pos in &destroyed {
            grid.set(pos, Symbol::Empty);
        }

        // The blast consumes its own wilds.
        for &pos in &live {
            grid.set(pos, Symbol::Empty);
            self.landed_this_drop.remove(&pos);
        }
        self.collected_total += live.len() as u64;
        self.in_winning_clusters.clear();

        log::debug!(
            "[ExplosionEngine::execute] {} origins, {} destroyed, {} collected",
            origins.len(),
            destroyed.len(),
            live.len()
        );

        Some(ExplosionEvent {
            origins: origins.into_iter().collect(),
            destroyed,
            collected: live.len() as u32,
        })
    }

    /// Clear all three sets at the end of a spin's cascade run
    pub fn reset_cascade_state(&mut self) {
        self.landed_this_drop.clear();
        self.in_winning_clusters.clear();
        self.spawned_this_cascade.clear();
    }

    /// EWs collected so far (cluster removals plus self-detonations)
    pub fn collected_total(&self) -> u64 {
        self.collected_total
    }
}
