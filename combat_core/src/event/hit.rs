//! Hit calculation event

use crate::config::HitConstants;
use crate::math;
use crate::types::EntityHandle;

/// Accuracy and evasion accumulators for one attack
#[derive(Debug, Clone, PartialEq)]
pub struct HitCalculationEvent {
    pub attacker: EntityHandle,
    pub target: EntityHandle,
    pub accuracy: f64,
    pub evasion: f64,
    pub accuracy_bonus: f64,
    pub evasion_bonus: f64,
    /// Skip the roll entirely
    pub force_hit: bool,
}

impl HitCalculationEvent {
    pub fn new(attacker: EntityHandle, target: EntityHandle, accuracy: f64, evasion: f64) -> Self {
        HitCalculationEvent {
            attacker,
            target,
            accuracy,
            evasion,
            accuracy_bonus: 0.0,
            evasion_bonus: 0.0,
            force_hit: false,
        }
    }

    /// Chance to hit in percent after bonuses
    pub fn hit_rate(&self, constants: &HitConstants) -> f64 {
        math::hit_rate(
            constants,
            self.accuracy + self.accuracy_bonus,
            self.evasion + self.evasion_bonus,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonuses_apply() {
        let mut event = HitCalculationEvent::new(EntityHandle(0), EntityHandle(1), 100.0, 20.0);
        let constants = HitConstants::default();
        assert!((event.hit_rate(&constants) - 80.0).abs() < f64::EPSILON);
        event.evasion_bonus = 30.0;
        assert!((event.hit_rate(&constants) - 50.0).abs() < f64::EPSILON);
        event.accuracy_bonus = 100.0;
        assert!((event.hit_rate(&constants) - 100.0).abs() < f64::EPSILON);
    }
}
