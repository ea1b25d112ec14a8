//! Round statistics and the star rating

use crate::consts::MISS_PENALTY_WEIGHT;

/// Efficiency needed for each star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarThresholds {
    pub three: f32,
    pub two: f32,
    pub one: f32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three: 0.8,
            two: 0.6,
            one: 0.4,
        }
    }
}

/// Per-round counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Spawn ticker firings
    pub attempts: u32,
    /// Correct sorts
    pub successes: u32,
    /// Firings skipped because the field was full
    pub missed: u32,
}

impl RoundStats {
    /// Success ratio minus a weighted penalty for missed spawns, floored at 0
    pub fn efficiency(&self) -> f32 {
        if self.attempts == 0 {
            return 0.0;
        }
        let attempts = self.attempts as f32;
        let success = self.successes as f32 / attempts;
        let penalty = self.missed as f32 / attempts * MISS_PENALTY_WEIGHT;
        (success - penalty).max(0.0)
    }

    pub fn stars(&self, thresholds: &StarThresholds) -> u8 {
        if self.attempts == 0 {
            return 0;
        }
        let e = self.efficiency();
        if e >= thresholds.three {
            3
        } else if e >= thresholds.two {
            2
        } else if e >= thresholds.one {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(attempts: u32, successes: u32, missed: u32) -> RoundStats {
        RoundStats {
            attempts,
            successes,
            missed,
        }
    }

    #[test]
    fn misses_cost_a_star() {
        let t = StarThresholds::default();
        assert_eq!(stats(10, 8, 0).stars(&t), 3);
        assert_eq!(stats(10, 8, 1).stars(&t), 2);
    }

    #[test]
    fn no_attempts_means_no_stars() {
        assert_eq!(stats(0, 0, 0).stars(&StarThresholds::default()), 0);
        assert_eq!(stats(0, 0, 0).efficiency(), 0.0);
    }

    #[test]
    fn efficiency_never_negative() {
        let s = stats(10, 0, 10);
        assert_eq!(s.efficiency(), 0.0);
        assert_eq!(s.stars(&StarThresholds::default()), 0);
    }

    #[test]
    fn lower_bands() {
        let t = StarThresholds::default();
        assert_eq!(stats(10, 6, 0).stars(&t), 2);
        assert_eq!(stats(10, 4, 0).stars(&t), 1);
        assert_eq!(stats(10, 3, 0).stars(&t), 0);
    }
}
