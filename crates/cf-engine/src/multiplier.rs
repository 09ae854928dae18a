//! Cascade multiplier trails
//!
//! A trail is six multipliers consumed by successive winning or
//! explosion-producing cascade steps, saturating on the last entry.

use serde::{Deserialize, Serialize};

/// Entries per trail
pub const TRAIL_LEN: usize = 6;

/// A saturating multiplier trail with a cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTrail {
    steps: [u32; TRAIL_LEN],
    position: usize,
}

impl MultiplierTrail {
    pub fn new(steps: [u32; TRAIL_LEN]) -> Self {
        Self { steps, position: 0 }
    }

    /// Free-spins trail: six successive doublings of the session base level,
    /// each entry clamped to `cap`
    pub fn from_base_level(base_level: u32, cap: u32) -> Self {
        let mut steps = [0u32; TRAIL_LEN];
        for (i, step) in steps.iter_mut().enumerate() {
            *step = (base_level << i).min(cap);
        }
        Self { steps, position: 0 }
    }

    /// Multiplier in effect for the current cascade step
    pub fn current(&self) -> u32 {
        self.steps[self.position]
    }

    /// Advance one step, saturating on the last entry
    pub fn advance(&mut self) {
        if self.position + 1 < TRAIL_LEN {
            self.position += 1;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn steps(&self) -> &[u32; TRAIL_LEN] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_saturates() {
        let mut trail = MultiplierTrail::new([1, 2, 4, 8, 16, 32]);
        let mut seen = Vec::new();
        for _ in 0..10 {
            seen.push(trail.current());
            trail.advance();
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 32, 32, 32, 32, 32]);
    }

    #[test]
    fn test_base_level_doubling() {
        let trail = MultiplierTrail::from_base_level(4, 1024);
        assert_eq!(trail.steps(), &[4, 8, 16, 32, 64, 128]);
    }

    #[test]
    fn test_top_level_hits_cap_exactly() {
        let trail = MultiplierTrail::from_base_level(32, 1024);
        assert_eq!(trail.steps(), &[32, 64, 128, 256, 512, 1024]);
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut trail = MultiplierTrail::new([1, 2, 4, 8, 16, 32]);
        trail.advance();
        trail.advance();
        assert_eq!(trail.current(), 4);
        trail.reset();
        assert_eq!(trail.current(), 1);
    }
}
