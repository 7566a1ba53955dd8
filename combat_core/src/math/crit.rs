//! Critical strike rolls

use crate::config::CritConstants;
use rand::Rng;

/// Crit rate after the cap, never negative
pub fn effective_crit_rate(constants: &CritConstants, rate: f64) -> f64 {
    rate.clamp(0.0, constants.rate_cap)
}

/// Roll a critical strike: succeeds if `random() < min(rate, cap)`
pub fn roll_crit<R: Rng + ?Sized>(constants: &CritConstants, rate: f64, rng: &mut R) -> bool {
    let rate = effective_crit_rate(constants, rate);
    if rate <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < rate
}

/// Multiplier applied on a critical strike; a skill override replaces the base
pub fn crit_multiplier(constants: &CritConstants, override_multiplier: Option<f64>) -> f64 {
    match override_multiplier {
        Some(m) if m > 0.0 => m,
        _ => constants.base_multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_crit_rate_capped_observably() {
        let constants = CritConstants::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        let crits = (0..1000)
            .filter(|_| roll_crit(&constants, 1.0, &mut rng))
            .count();
        let fraction = crits as f64 / 1000.0;
        assert!(
            (0.70..=0.90).contains(&fraction),
            "crit fraction {} outside [0.70, 0.90]",
            fraction
        );
    }

    #[test]
    fn test_zero_rate_never_crits() {
        let constants = CritConstants::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!((0..500).all(|_| !roll_crit(&constants, 0.0, &mut rng)));
        assert!((0..500).all(|_| !roll_crit(&constants, -0.5, &mut rng)));
    }

    #[test]
    fn test_crit_multiplier_override() {
        let constants = CritConstants::default();
        assert!((crit_multiplier(&constants, None) - 1.5).abs() < f64::EPSILON);
        assert!((crit_multiplier(&constants, Some(2.0)) - 2.0).abs() < f64::EPSILON);
        assert!((crit_multiplier(&constants, Some(0.0)) - 1.5).abs() < f64::EPSILON);
    }
}
