//! Cluster detection
//!
//! Two-phase detection over a grid snapshot. Phase one unions 4-adjacent
//! cells holding the same paying symbol into components (disjoint-set with
//! path compression and union by rank). Phase two extends every component
//! with each wild reachable through 4-adjacency, chaining wild-to-wild, so
//! one wild can pay in several differently colored clusters at once.
//! Same-colored components that meet through a shared wild are one
//! connected region and merge into a single cluster.
//!
//! Scatters and empty cells join nothing. Only clusters of at least five
//! cells with at least one non-wild member survive the filter. The output
//! is sorted by (symbol, first footprint cell) so downstream RNG
//! consumption sees a fixed order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::{MAX_PAY_CLUSTER_SIZE, MIN_CLUSTER_SIZE};
use crate::grid::{GRID_SIZE, Grid, Position};
use crate::symbols::Symbol;

const CELLS: usize = GRID_SIZE * GRID_SIZE;

/// A paying cluster: its anchor symbol and full footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// The paying symbol this cluster is scored as (never a wild)
    pub symbol: Symbol,
    /// Footprint at detection time, sorted row-major; includes member wilds
    pub positions: Vec<Position>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// Size used for the paytable lookup (clamped to the top row)
    pub fn payout_size(&self) -> usize {
        self.size().min(MAX_PAY_CLUSTER_SIZE)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }
}

struct DisjointSet {
    parent: [usize; CELLS],
    rank: [u8; CELLS],
}

impl DisjointSet {
    fn new() -> Self {
        let mut parent = [0usize; CELLS];
        for (i, slot) in parent.iter_mut().enumerate() {
            *slot = i;
        }
        Self {
            parent,
            rank: [0; CELLS],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// A same-symbol component plus the wilds it reaches
struct Candidate {
    symbol: Symbol,
    cells: BTreeSet<Position>,
    wilds: BTreeSet<Position>,
}

/// Detect all paying clusters on the grid
pub fn find_clusters(grid: &Grid) -> Vec<Cluster> {
    let mut sets = DisjointSet::new();

    for pos in Grid::positions() {
        let symbol = grid.symbol_at(pos);
        if !symbol.is_paying() {
            continue;
        }
        // Right and down cover every edge once.
        for (dr, dc) in [(1usize, 0usize), (0, 1)] {
            let (row, col) = (pos.row as usize + dr, pos.col as usize + dc);
            if row < GRID_SIZE && col < GRID_SIZE {
                let next = Position::new(row, col);
                if grid.symbol_at(next) == symbol {
                    sets.union(pos.index(), next.index());
                }
            }
        }
    }

    // Group paying cells by component root, keyed for stable iteration.
    let mut components: BTreeMap<usize, Vec<Position>> = BTreeMap::new();
    for pos in Grid::positions() {
        if grid.symbol_at(pos).is_paying() {
            components.entry(sets.find(pos.index())).or_default().push(pos);
        }
    }

    // Extend each component with its reachable wilds.
    let candidates = components.into_values().map(|cells| {
        let symbol = grid.symbol_at(cells[0]);
        let mut wilds = BTreeSet::new();
        let mut queue: VecDeque<Position> = cells.iter().copied().collect();
        while let Some(pos) = queue.pop_front() {
            for neighbor in pos.neighbors() {
                if grid.symbol_at(neighbor).is_wild() && wilds.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        Candidate {
            symbol,
            cells: cells.into_iter().collect(),
            wilds,
        }
    });

    // Merge same-symbol candidates that share a wild: they are one
    // connected region and must pay once.
    let mut merged: Vec<Candidate> = Vec::new();
    for mut candidate in candidates {
        loop {
            let overlap = merged.iter().position(|other| {
                other.symbol == candidate.symbol
                    && other.wilds.intersection(&candidate.wilds).next().is_some()
            });
            match overlap {
                Some(i) => {
                    let other = merged.swap_remove(i);
                    candidate.cells.extend(other.cells);
                    candidate.wilds.extend(other.wilds);
                }
                None => {
                    merged.push(candidate);
                    break;
                }
            }
        }
    }

    let mut clusters: Vec<Cluster> = merged
        .into_iter()
        .filter_map(|candidate| {
            let positions: Vec<Position> = candidate
                .cells
                .iter()
                .chain(candidate.wilds.iter())
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            (positions.len() >= MIN_CLUSTER_SIZE).then_some(Cluster {
                symbol: candidate.symbol,
                positions,
            })
        })
        .collect();

    clusters.sort_by_key(|c| (c.symbol.index(), c.positions[0]));
    clusters
}
