//! Elemental components - resistances, immunities and damage bonuses

use super::SkillComponent;
use crate::context::ActionScope;
use crate::event::DamageCalculationEvent;
use crate::stats::{ElementTable, StatAccumulator, StatKind};
use crate::types::Element;
use serde::Deserialize;

/// Per-element values keyed `<element>_<suffix>` in definitions
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ResistFields {
    #[serde(alias = "neutral")]
    pub neutral_resist: f64,
    #[serde(alias = "fire")]
    pub fire_resist: f64,
    #[serde(alias = "water")]
    pub water_resist: f64,
    #[serde(alias = "ice")]
    pub ice_resist: f64,
    #[serde(alias = "lightning")]
    pub lightning_resist: f64,
    #[serde(alias = "earth")]
    pub earth_resist: f64,
    #[serde(alias = "wind")]
    pub wind_resist: f64,
    #[serde(alias = "light")]
    pub light_resist: f64,
    #[serde(alias = "dark")]
    pub dark_resist: f64,
}

impl From<ResistFields> for ElementTable {
    fn from(f: ResistFields) -> Self {
        ElementTable {
            neutral: f.neutral_resist,
            fire: f.fire_resist,
            water: f.water_resist,
            ice: f.ice_resist,
            lightning: f.lightning_resist,
            earth: f.earth_resist,
            wind: f.wind_resist,
            light: f.light_resist,
            dark: f.dark_resist,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct DamageFields {
    #[serde(alias = "neutral")]
    pub neutral_damage: f64,
    #[serde(alias = "fire")]
    pub fire_damage: f64,
    #[serde(alias = "water")]
    pub water_damage: f64,
    #[serde(alias = "ice")]
    pub ice_damage: f64,
    #[serde(alias = "lightning")]
    pub lightning_damage: f64,
    #[serde(alias = "earth")]
    pub earth_damage: f64,
    #[serde(alias = "wind")]
    pub wind_damage: f64,
    #[serde(alias = "light")]
    pub light_damage: f64,
    #[serde(alias = "dark")]
    pub dark_damage: f64,
}

impl From<DamageFields> for ElementTable {
    fn from(f: DamageFields) -> Self {
        ElementTable {
            neutral: f.neutral_damage,
            fire: f.fire_damage,
            water: f.water_damage,
            ice: f.ice_damage,
            lightning: f.lightning_damage,
            earth: f.earth_damage,
            wind: f.wind_damage,
            light: f.light_damage,
            dark: f.dark_damage,
        }
    }
}

/// Flat defenses plus per-element resistance, e.g. `fire_resist = 0.2`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatDefense {
    pub defense: f64,
    pub ap_defense: f64,
    #[serde(flatten)]
    pub resist: ResistFields,
}

impl SkillComponent for StatDefense {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        if self.defense != 0.0 {
            stats.add_flat(StatKind::Defense, self.defense);
        }
        if self.ap_defense != 0.0 {
            stats.add_flat(StatKind::ApDefense, self.ap_defense);
        }
        let resist = ElementTable::from(self.resist);
        for element in Element::all() {
            let value = resist.get(*element);
            if value != 0.0 {
                stats.add_resist(*element, value);
            }
        }
    }
}

/// Per-element outgoing damage bonus, e.g. `ice_damage = 0.15`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatElementalDamage {
    #[serde(flatten)]
    pub bonus: DamageFields,
}

impl SkillComponent for StatElementalDamage {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        let bonus = ElementTable::from(self.bonus);
        for element in Element::all() {
            let value = bonus.get(*element);
            if value != 0.0 {
                stats.add_elemental_damage(*element, value);
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElementalResistance {
    pub element: Element,
    pub amount: f64,
}

impl Default for ElementalResistance {
    fn default() -> Self {
        ElementalResistance {
            element: Element::Neutral,
            amount: 0.2,
        }
    }
}

impl SkillComponent for ElementalResistance {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        stats.add_resist(self.element, self.amount);
    }
}

/// Damage of one element is ignored entirely
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementalImmunity {
    pub element: Element,
}

impl SkillComponent for ElementalImmunity {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        stats.add_immunity(self.element);
    }
}

/// The owner's hits deal damage of another element
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementShift {
    pub element: Element,
}

impl SkillComponent for ElementShift {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        event.attribute = self.element;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{skill, steady, Arena, FOE, HERO};
    use crate::types::Element;
    use serde_json::json;

    #[test]
    fn test_stat_defense_table() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        arena.equip(
            HERO,
            skill("ward", vec![("stat_defense", json!({"defense": 5, "fire_resist": 0.3, "ice": 0.1}))]),
        );
        let snapshot = arena.roster.snapshot(HERO).unwrap();
        assert!((snapshot.defense() - 5.0).abs() < f64::EPSILON);
        assert!((snapshot.resist.get(Element::Fire) - 0.3).abs() < f64::EPSILON);
        assert!((snapshot.resist.get(Element::Ice) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_immunity_negates_damage() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 50.0));
        arena.equip(
            HERO,
            skill("fireproof", vec![("elemental_immunity", json!({"element": "fire"}))]),
        );
        let flame = skill(
            "flame",
            vec![("element_shift", json!({"element": "fire"})), ("attack", json!({}))],
        );
        arena.cast(FOE, &flame);
        assert_eq!(arena.hp(HERO), 100);
        assert!(arena.log.contains("immune to Fire damage"));
    }

    #[test]
    fn test_elemental_damage_bonus() {
        let mut arena = Arena::duel(steady(100, 100.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        arena.equip(
            HERO,
            skill("focus", vec![("stat_elemental_damage", json!({"neutral_damage": 0.5}))]),
        );
        let strike = skill("strike", vec![("attack", json!({}))]);
        arena.cast(HERO, &strike);
        assert_eq!(arena.hp(FOE), 850);
    }
}
