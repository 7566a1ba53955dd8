//! Damage formulas
//!
//! Formula:
//! - damage = floor(attack * skill_mult * attribute_mult)
//!   - floor(defense * (1 - min(pen, cap)) * ratio)
//! - ratio is 0.5 for physical hits and 0.4 for magical hits
//! - the result is floored at the minimum damage (1)

use crate::config::DamageConstants;
use crate::types::Element;
use rand::Rng;

/// Penetration after the cap, never negative
pub fn effective_penetration(constants: &DamageConstants, penetration: f64) -> f64 {
    penetration.clamp(0.0, constants.armor_pen_cap)
}

/// Shared body of the physical and magical formulas
pub fn mitigated_damage(
    constants: &DamageConstants,
    attack: f64,
    defense: f64,
    skill_multiplier: f64,
    attribute_multiplier: f64,
    penetration: f64,
    defense_ratio: f64,
) -> i64 {
    let pen = effective_penetration(constants, penetration);
    let raw = (attack.max(0.0) * skill_multiplier.max(0.0) * attribute_multiplier.max(0.0)).floor();
    let reduction = (defense.max(0.0) * (1.0 - pen) * defense_ratio).floor();

    ((raw - reduction) as i64).max(constants.min_damage)
}

/// Physical hit against armour
pub fn physical_damage(
    constants: &DamageConstants,
    attack: f64,
    defense: f64,
    skill_multiplier: f64,
    attribute_multiplier: f64,
    armor_pen: f64,
) -> i64 {
    mitigated_damage(
        constants,
        attack,
        defense,
        skill_multiplier,
        attribute_multiplier,
        armor_pen,
        constants.physical_defense_ratio,
    )
}

/// Magical hit against magic defense
pub fn magical_damage(
    constants: &DamageConstants,
    ap_attack: f64,
    ap_defense: f64,
    skill_multiplier: f64,
    attribute_multiplier: f64,
    magic_pen: f64,
) -> i64 {
    mitigated_damage(
        constants,
        ap_attack,
        ap_defense,
        skill_multiplier,
        attribute_multiplier,
        magic_pen,
        constants.magical_defense_ratio,
    )
}

/// Scale damage by a uniform factor in [1 - variance, 1 + variance]
pub fn apply_variance<R: Rng + ?Sized>(
    constants: &DamageConstants,
    damage: i64,
    rng: &mut R,
) -> i64 {
    if damage <= 0 {
        return constants.min_damage;
    }
    let variance = constants.variance.abs();
    let factor = if variance > 0.0 {
        rng.gen_range((1.0 - variance)..=(1.0 + variance))
    } else {
        1.0
    };
    ((damage as f64 * factor).floor() as i64).max(constants.min_damage)
}

/// Elemental matchup multiplier plus the attacker's flat elemental damage bonus
pub fn attribute_multiplier(
    constants: &DamageConstants,
    attack_element: Element,
    defender_element: Element,
    elemental_bonus: f64,
) -> f64 {
    let matchup = if attack_element.strong_against().contains(&defender_element) {
        constants.element_advantage
    } else if defender_element.strong_against().contains(&attack_element) {
        constants.element_disadvantage
    } else {
        1.0
    };
    (matchup * (1.0 + elemental_bonus)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn constants() -> DamageConstants {
        DamageConstants::default()
    }

    #[test]
    fn test_physical_damage_basic() {
        // 100 - floor(50 * 0.5) = 75
        let damage = physical_damage(&constants(), 100.0, 50.0, 1.0, 1.0, 0.0);
        assert_eq!(damage, 75);
    }

    #[test]
    fn test_magical_damage_uses_lower_ratio() {
        // 100 - floor(50 * 0.4) = 80
        let damage = magical_damage(&constants(), 100.0, 50.0, 1.0, 1.0, 0.0);
        assert_eq!(damage, 80);
    }

    #[test]
    fn test_armor_pen_is_capped() {
        // pen 1.0 -> 0.7: 100 - floor(100 * 0.3 * 0.5) = 85
        let capped = physical_damage(&constants(), 100.0, 100.0, 1.0, 1.0, 1.0);
        let at_cap = physical_damage(&constants(), 100.0, 100.0, 1.0, 1.0, 0.7);
        assert_eq!(capped, 85);
        assert_eq!(capped, at_cap);
    }

    #[test]
    fn test_minimum_damage_floor() {
        let damage = physical_damage(&constants(), 10.0, 10_000.0, 1.0, 1.0, 0.0);
        assert_eq!(damage, 1);
    }

    #[test]
    fn test_zero_attack_clamps() {
        let damage = physical_damage(&constants(), 0.0, 0.0, 1.0, 1.0, 0.0);
        assert_eq!(damage, 1);
        let negative = physical_damage(&constants(), -50.0, 10.0, 1.0, 1.0, -1.0);
        assert_eq!(negative, 1);
    }

    #[test]
    fn test_variance_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let damage = apply_variance(&constants(), 75, &mut rng);
            assert!((60..=90).contains(&damage), "damage {} out of range", damage);
        }
    }

    #[test]
    fn test_variance_disabled() {
        let mut no_variance = constants();
        no_variance.variance = 0.0;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        assert_eq!(apply_variance(&no_variance, 75, &mut rng), 75);
    }

    #[test]
    fn test_attribute_multiplier() {
        let c = constants();
        assert!((attribute_multiplier(&c, Element::Fire, Element::Ice, 0.0) - 1.25).abs() < 1e-9);
        assert!((attribute_multiplier(&c, Element::Ice, Element::Fire, 0.0) - 0.8).abs() < 1e-9);
        assert!((attribute_multiplier(&c, Element::Neutral, Element::Fire, 0.0) - 1.0).abs() < 1e-9);
        // 20% fire damage bonus on top of advantage
        assert!((attribute_multiplier(&c, Element::Fire, Element::Wind, 0.2) - 1.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_penetration_never_exceeds_cap(pen in 0.0f64..=1.0) {
            let applied = effective_penetration(&constants(), pen);
            prop_assert!(applied <= 0.70 + f64::EPSILON);
        }

        #[test]
        fn prop_damage_at_least_one(
            attack in 0.0f64..10_000.0,
            defense in 0.0f64..100_000.0,
            pen in 0.0f64..=1.0,
        ) {
            prop_assert!(physical_damage(&constants(), attack, defense, 1.0, 1.0, pen) >= 1);
            prop_assert!(magical_damage(&constants(), attack, defense, 1.0, 1.0, pen) >= 1);
        }
    }
}
