//! Free-spins session state
//!
//! A session tracks its spin budget, the multiplier base level, and the
//! explosivo-wild collection meter. Every three collected EWs convert into
//! one pending upgrade; upgrades apply at the start of the next spin (never
//! mid-spin), each raising the base level one step and adding one spin.

use serde::{Deserialize, Serialize};

use crate::config::ScatterAwards;

/// Highest base-level index (levels are 1, 2, 4, 8, 16, 32)
pub const MAX_BASE_LEVEL_INDEX: usize = 5;
/// Collected EWs per upgrade
pub const EWS_PER_UPGRADE: u64 = 3;

/// Mutable state of one free-spins session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsState {
    pub spins_remaining: u32,
    pub base_level_index: usize,
    /// EWs collected across the whole session; never decrements
    pub ew_collected_total: u64,
    /// Collection remainder toward the next upgrade (0..3)
    pub upgrade_meter: u64,
    /// Upgrades waiting for the next spin boundary
    pub pending_upgrades: u32,
    /// Session win in currency units
    pub session_win: f64,
    /// Bookkeeping for the result summary
    pub spins_played: u32,
    pub total_awarded: u32,
    pub retriggers: u32,
    pub upgrades_granted: u32,
}

impl FreeSpinsState {
    fn with_spins(spins: u32) -> Self {
        Self {
            spins_remaining: spins,
            base_level_index: 0,
            ew_collected_total: 0,
            upgrade_meter: 0,
            pending_upgrades: 0,
            session_win: 0.0,
            spins_played: 0,
            total_awarded: spins,
            retriggers: 0,
            upgrades_granted: 0,
        }
    }

    /// Entry from the base game with the latched scatter count
    pub fn from_scatters(awards: &ScatterAwards, scatters: u8) -> Self {
        Self::with_spins(awards.entry_spins(scatters))
    }

    /// Feature-buy entry: the minimum award, cost debited by the driver
    pub fn feature_buy(awards: &ScatterAwards) -> Self {
        Self::with_spins(awards.entry_base)
    }

    /// Apply pending upgrades at a spin boundary: each raises the base
    /// level one step (saturating) and adds one spin. Returns how many
    /// applied.
    pub fn apply_pending_upgrades(&mut self) -> u32 {
        let applied = self.pending_upgrades;
        for _ in 0..applied {
            self.base_level_index = (self.base_level_index + 1).min(MAX_BASE_LEVEL_INDEX);
            self.spins_remaining += 1;
            self.total_awarded += 1;
        }
        self.pending_upgrades = 0;
        applied
    }

    /// Record collected EWs and convert full meters into pending upgrades
    pub fn collect_ews(&mut self, count: u32) {
        self.ew_collected_total += u64::from(count);
        self.upgrade_meter += u64::from(count);
        while self.upgrade_meter >= EWS_PER_UPGRADE {
            self.upgrade_meter -= EWS_PER_UPGRADE;
            self.pending_upgrades += 1;
            self.upgrades_granted += 1;
        }
    }

    /// Award retrigger spins (no cap)
    pub fn retrigger(&mut self, spins: u32) {
        self.spins_remaining += spins;
        self.total_awarded += spins;
        self.retriggers += 1;
    }

    /// Max win cancels everything still pending
    pub fn cancel_pending(&mut self) {
        self.spins_remaining = 0;
        self.pending_upgrades = 0;
    }

    /// The multiplier base level for the current spin
    pub fn base_level(&self, levels: &[u32; 6]) -> u32 {
        levels[self.base_level_index]
    }

    /// Session continues while spins remain or an upgrade will add one
    pub fn has_next_spin(&self) -> bool {
        self.spins_remaining > 0 || self.pending_upgrades > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn awards() -> ScatterAwards {
        GameConfig::standard().scatter_awards
    }

    #[test]
    fn test_entry_spin_counts() {
        assert_eq!(FreeSpinsState::from_scatters(&awards(), 3).spins_remaining, 10);
        assert_eq!(FreeSpinsState::from_scatters(&awards(), 4).spins_remaining, 12);
        assert_eq!(FreeSpinsState::from_scatters(&awards(), 5).spins_remaining, 14);
        assert_eq!(FreeSpinsState::feature_buy(&awards()).spins_remaining, 10);
    }

    #[test]
    fn test_collection_converts_in_threes() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        state.collect_ews(2);
        assert_eq!(state.pending_upgrades, 0);
        assert_eq!(state.upgrade_meter, 2);

        state.collect_ews(4);
        assert_eq!(state.ew_collected_total, 6);
        assert_eq!(state.pending_upgrades, 2);
        assert_eq!(state.upgrade_meter, 0);
    }

    #[test]
    fn test_collection_ledger_invariant() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        for n in [1, 5, 2, 7, 3] {
            state.collect_ews(n);
            let granted = u64::from(state.upgrades_granted);
            assert_eq!(
                state.ew_collected_total,
                granted * EWS_PER_UPGRADE + state.upgrade_meter
            );
            assert!(state.upgrade_meter < EWS_PER_UPGRADE);
        }
    }

    #[test]
    fn test_upgrades_apply_at_spin_boundary() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        state.collect_ews(6);
        assert_eq!(state.base_level_index, 0);

        let applied = state.apply_pending_upgrades();
        assert_eq!(applied, 2);
        assert_eq!(state.base_level_index, 2);
        assert_eq!(state.spins_remaining, 12);
        assert_eq!(state.pending_upgrades, 0);

        let levels = GameConfig::standard().free_spins_base_levels;
        assert_eq!(state.base_level(&levels), 4);
    }

    #[test]
    fn test_base_level_saturates() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        state.collect_ews(30);
        state.apply_pending_upgrades();
        assert_eq!(state.base_level_index, MAX_BASE_LEVEL_INDEX);
    }

    #[test]
    fn test_retrigger_has_no_cap() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        for _ in 0..10 {
            state.retrigger(awards().retrigger_spins(3));
        }
        assert_eq!(state.spins_remaining, 10 + 50);
        assert_eq!(state.retriggers, 10);
    }

    #[test]
    fn test_pending_upgrade_extends_session() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        state.spins_remaining = 0;
        assert!(!state.has_next_spin());
        state.collect_ews(3);
        assert!(state.has_next_spin());
        state.apply_pending_upgrades();
        assert_eq!(state.spins_remaining, 1);
    }

    #[test]
    fn test_cancel_pending_on_max_win() {
        let mut state = FreeSpinsState::from_scatters(&awards(), 3);
        state.collect_ews(3);
        state.cancel_pending();
        assert_eq!(state.spins_remaining, 0);
        assert_eq!(state.pending_upgrades, 0);
        assert!(!state.has_next_spin());
        // The ledger keeps what was granted.
        assert_eq!(state.upgrades_granted, 1);
    }
}
