//! Post-win wild spawning
//!
//! After winning cells are cleared, each cluster spawns one wild back into
//! its original footprint. Clusters are processed in detection order; the
//! symbol draw happens unconditionally (one draw per cluster) so the random
//! stream stays aligned even when a spawn is forfeited.

use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::config::WildSpawnWeights;
use crate::grid::{Grid, Position};
use crate::rng::GameRng;
use crate::symbols::Symbol;

/// One wild written back into a cleared footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedWild {
    pub symbol: Symbol,
    pub position: Position,
    /// The cluster that produced it
    pub cluster_symbol: Symbol,
}

/// Result of one spawning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOutcome {
    pub spawned: Vec<SpawnedWild>,
    /// Clusters whose footprint had no free cell left
    pub forfeited: u32,
}

/// Spawn one wild per cluster into the cleared footprints
///
/// A cell claimed by an earlier cluster in the batch is unavailable to
/// later ones. A cluster with no available footprint cell forfeits its
/// spawn; the symbol draw has already been consumed by then.
pub fn spawn_wilds(
    grid: &mut Grid,
    clusters: &[Cluster],
    spawn: &WildSpawnWeights,
    rng: &mut GameRng,
) -> SpawnOutcome {
    let mut outcome = SpawnOutcome::default();
    let mut claimed: Vec<Position> = Vec::new();

    for cluster in clusters {
        let symbol = WildSpawnWeights::SYMBOLS[rng.weighted(&spawn.as_weights())];

        // Footprints are already sorted row-major, so the candidate list is too.
        let candidates: Vec<Position> = cluster
            .positions
            .iter()
            .copied()
            .filter(|p| grid.symbol_at(*p).is_empty() && !claimed.contains(p))
            .collect();

        if candidates.is_empty() {
            log::debug!(
                "[spawn_wilds] forfeited {} spawn, footprint fully occupied",
                cluster.symbol
            );
            outcome.forfeited += 1;
            continue;
        }

        let position = candidates[rng.bounded(candidates.len())];
        grid.set(position, symbol);
        claimed.push(position);
        outcome.spawned.push(SpawnedWild {
            symbol,
            position,
            cluster_symbol: cluster.symbol,
        });
    }

    outcome
}
