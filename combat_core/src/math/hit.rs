//! Hit / evasion rolls
//!
//! Formula: hit_rate = clamp(accuracy - evasion, 5, 100); a hit lands when a
//! uniform roll in [1, 100] is at most hit_rate.

use crate::config::HitConstants;
use rand::Rng;

/// Chance to hit, in percent
pub fn hit_rate(constants: &HitConstants, accuracy: f64, evasion: f64) -> f64 {
    (accuracy - evasion).clamp(constants.min_rate, constants.max_rate)
}

/// Roll whether an attack connects
pub fn roll_hit<R: Rng + ?Sized>(
    constants: &HitConstants,
    accuracy: f64,
    evasion: f64,
    rng: &mut R,
) -> bool {
    let rate = hit_rate(constants, accuracy, evasion);
    let roll = rng.gen_range(1..=100) as f64;
    roll <= rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_hit_rate_clamped() {
        let c = HitConstants::default();
        assert!((hit_rate(&c, 100.0, 0.0) - 100.0).abs() < f64::EPSILON);
        assert!((hit_rate(&c, 300.0, 0.0) - 100.0).abs() < f64::EPSILON);
        assert!((hit_rate(&c, 10.0, 90.0) - 5.0).abs() < f64::EPSILON);
        assert!((hit_rate(&c, 100.0, 30.0) - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_accuracy_always_hits() {
        let c = HitConstants::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        assert!((0..1000).all(|_| roll_hit(&c, 100.0, 0.0, &mut rng)));
    }

    #[test]
    fn test_floor_still_hits_sometimes() {
        let c = HitConstants::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let hits = (0..2000).filter(|_| roll_hit(&c, 0.0, 500.0, &mut rng)).count();
        // 5% floor
        assert!(hits > 40 && hits < 180, "hits = {}", hits);
    }
}
