//! Damage events: before calculation, before mitigation, after dealing

use crate::types::{Element, EntityHandle};

/// Outgoing damage before it is resolved
///
/// `base_damage` is the ratio-scaled attack. Components push multipliers,
/// raise penetration or adjust crit before the numbers are run.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageCalculationEvent {
    pub attacker: EntityHandle,
    pub target: EntityHandle,
    pub skill_name: String,
    pub attribute: Element,
    pub is_physical: bool,
    pub base_damage: f64,
    /// Multiplied together into the skill multiplier
    pub multipliers: Vec<f64>,
    /// Fraction of defense ignored; added to armor_pen before the cap
    pub defense_ignore: f64,
    pub armor_pen: f64,
    /// Added to the attacker's crit rate before the cap
    pub crit_rate_bonus: f64,
    /// Replaces the base crit multiplier when set
    pub crit_multiplier: Option<f64>,
    pub force_crit: bool,
    /// Set during resolution
    pub is_crit: bool,
    pub logs: Vec<String>,
}

impl DamageCalculationEvent {
    pub fn new(
        attacker: EntityHandle,
        target: EntityHandle,
        skill_name: impl Into<String>,
        attribute: Element,
        base_damage: f64,
        is_physical: bool,
    ) -> Self {
        DamageCalculationEvent {
            attacker,
            target,
            skill_name: skill_name.into(),
            attribute,
            is_physical,
            base_damage,
            multipliers: Vec::new(),
            defense_ignore: 0.0,
            armor_pen: 0.0,
            crit_rate_bonus: 0.0,
            crit_multiplier: None,
            force_crit: false,
            is_crit: false,
            logs: Vec::new(),
        }
    }

    pub fn add_multiplier(&mut self, multiplier: f64) {
        self.multipliers.push(multiplier);
    }

    /// Product of every pushed multiplier
    pub fn total_multiplier(&self) -> f64 {
        self.multipliers.iter().product()
    }

    /// Penetration before the cap
    pub fn total_penetration(&self) -> f64 {
        self.armor_pen + self.defense_ignore
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }
}

/// Incoming damage on the defender, before the mitigation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TakeDamageEvent {
    pub target: EntityHandle,
    pub attacker: Option<EntityHandle>,
    pub damage: i64,
    pub attribute: Element,
    pub is_reflected: bool,
    /// Set by a component that fully negates the hit
    pub negated: bool,
}

impl TakeDamageEvent {
    pub fn new(
        target: EntityHandle,
        attacker: Option<EntityHandle>,
        damage: i64,
        attribute: Element,
        is_reflected: bool,
    ) -> Self {
        TakeDamageEvent {
            target,
            attacker,
            damage,
            attribute,
            is_reflected,
            negated: false,
        }
    }

    /// Scale the damage, flooring at one
    pub fn scale(&mut self, factor: f64) {
        self.damage = ((self.damage as f64 * factor.max(0.0)).floor() as i64).max(1);
    }
}

/// Damage after the pipeline ran; read by lifesteal and on-hit triggers
#[derive(Debug, Clone, PartialEq)]
pub struct DamageDealtEvent {
    pub attacker: EntityHandle,
    pub target: EntityHandle,
    pub skill_name: String,
    pub attribute: Element,
    /// Damage sent into the pipeline
    pub raw: i64,
    /// HP actually lost by the target
    pub damage: i64,
    pub absorbed: i64,
    pub is_crit: bool,
    pub target_died: bool,
}

impl DamageDealtEvent {
    /// Everything that landed, shields included
    pub fn landed(&self) -> i64 {
        self.damage + self.absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_multiplier() {
        let mut event = DamageCalculationEvent::new(
            EntityHandle(0),
            EntityHandle(1),
            "Slash",
            Element::Neutral,
            100.0,
            true,
        );
        assert!((event.total_multiplier() - 1.0).abs() < f64::EPSILON);
        event.add_multiplier(1.5);
        event.add_multiplier(1.2);
        assert!((event.total_multiplier() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_take_damage_scale_floors_at_one() {
        let mut event =
            TakeDamageEvent::new(EntityHandle(1), None, 10, Element::Fire, false);
        event.scale(0.5);
        assert_eq!(event.damage, 5);
        event.scale(0.0);
        assert_eq!(event.damage, 1);
    }
}
