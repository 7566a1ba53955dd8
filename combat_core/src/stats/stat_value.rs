//! StatValue - one stat during a snapshot: base, then flat, increased, more

use serde::{Deserialize, Serialize};

/// One stat being assembled for a snapshot
///
/// `(base + flat) * (1 + increased) * more`, where flat amounts come from
/// buffs and statuses, increased percentages from passives and auras, and
/// `more` is the running product of independent multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub increased: f64,
    pub more: f64,
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue::with_base(0.0)
    }
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            flat: 0.0,
            increased: 0.0,
            more: 1.0,
        }
    }

    /// Final value; a net increase below -100% yields zero, not a sign flip
    pub fn compute(&self) -> f64 {
        (self.base + self.flat) * (1.0 + self.increased).max(0.0) * self.more
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Percent as a fraction: 0.25 adds 25% of base plus flat
    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    pub fn add_more(&mut self, multiplier: f64) {
        self.more *= multiplier;
    }

    /// True when nothing but the base contributes
    pub fn is_unmodified(&self) -> bool {
        self.flat == 0.0 && self.increased == 0.0 && self.more == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        let attack = StatValue::with_base(24.0);
        assert!(attack.is_unmodified());
        assert!((attack.compute() - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_buff_then_passive_then_multiplier() {
        // (20 + 5) * 1.3 * 1.5 = 48.75
        let mut attack = StatValue::with_base(20.0);
        attack.add_flat(5.0);
        attack.add_increased(0.1);
        attack.add_increased(0.2);
        attack.add_more(1.5);
        assert!((attack.compute() - 48.75).abs() < 1e-9);
        assert!(!attack.is_unmodified());
    }

    #[test]
    fn test_debuff_below_zero_floors_increase() {
        let mut speed = StatValue::with_base(12.0);
        speed.add_increased(-0.6);
        speed.add_increased(-0.6);
        assert_eq!(speed.compute(), 0.0);
    }

    #[test]
    fn test_negative_flat_can_cancel_base() {
        let mut defense = StatValue::with_base(8.0);
        defense.add_flat(-8.0);
        assert_eq!(defense.compute(), 0.0);
    }
}
