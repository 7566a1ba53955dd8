//! Offensive components - hits and the modifiers that shape them

use super::condition::{self, Condition};
use super::SkillComponent;
use crate::context::{ActionScope, AttackSpec};
use crate::event::{DamageCalculationEvent, DamageDealtEvent, HitCalculationEvent};
use crate::status::StatusKind;
use serde::Deserialize;

/// Formula-driven damage against the target, or every enemy with `aoe`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Attack {
    pub ad_ratio: f64,
    pub ap_ratio: f64,
    pub hit_count: u32,
    pub crit_bonus: f64,
    pub armor_pen: f64,
    pub is_physical: bool,
    pub aoe: bool,
}

impl Default for Attack {
    fn default() -> Self {
        Attack {
            ad_ratio: 1.0,
            ap_ratio: 0.0,
            hit_count: 1,
            crit_bonus: 0.0,
            armor_pen: 0.0,
            is_physical: true,
            aoe: false,
        }
    }
}

impl SkillComponent for Attack {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let targets = if self.aoe {
            scope.enemies()
        } else {
            match scope.target() {
                Ok(target) => vec![target],
                Err(err) => return scope.recover(err),
            }
        };

        for target in targets {
            let spec = AttackSpec {
                target,
                attribute: scope.skill_attribute(),
                ad_ratio: self.ad_ratio,
                ap_ratio: self.ap_ratio,
                is_physical: self.is_physical,
                armor_pen: self.armor_pen,
                crit_bonus: self.crit_bonus,
            };
            for _ in 0..self.hit_count.max(1) {
                if !scope.is_alive(target) || !scope.is_alive(scope.owner) {
                    break;
                }
                if let Err(err) = scope.attack(&spec) {
                    return scope.recover(err);
                }
            }
        }
        None
    }
}

/// Extra crit chance, a replacement crit multiplier, or a guaranteed crit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Crit {
    pub rate: f64,
    pub rate_bonus: f64,
    /// Replaces the base crit multiplier
    pub damage: Option<f64>,
    pub force: bool,
    pub condition: Option<Condition>,
}

impl SkillComponent for Crit {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if !condition::check(self.condition, scope, event.target) {
            return None;
        }
        event.crit_rate_bonus += self.rate + self.rate_bonus;
        if let Some(multiplier) = self.damage {
            event.crit_multiplier = Some(multiplier);
        }
        if self.force {
            event.force_crit = true;
        }
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Penetration {
    pub armor_pen: f64,
    pub magic_pen: f64,
    /// Fraction of defense ignored for either damage type
    pub defense_ignore: f64,
}

impl SkillComponent for Penetration {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        event.armor_pen += if event.is_physical {
            self.armor_pen
        } else {
            self.magic_pen
        };
        event.defense_ignore += self.defense_ignore;
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Accuracy {
    pub bonus: f64,
}

impl SkillComponent for Accuracy {
    fn on_hit_calculation(
        &self,
        event: &mut HitCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if event.attacker == scope.owner {
            event.accuracy_bonus += self.bonus;
        }
        None
    }
}

/// The owner's hits cannot miss
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrueStrike {}

impl SkillComponent for TrueStrike {
    fn on_hit_calculation(
        &self,
        event: &mut HitCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if event.attacker == scope.owner {
            event.force_hit = true;
        }
        None
    }
}

/// Bonus damage against targets at or below an HP ratio
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Execute {
    pub threshold: f64,
    pub multiplier: f64,
}

impl Default for Execute {
    fn default() -> Self {
        Execute {
            threshold: 0.3,
            multiplier: 2.0,
        }
    }
}

impl SkillComponent for Execute {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if scope.hp_ratio(event.target) <= self.threshold {
            event.add_multiplier(self.multiplier);
            event.log(format!("{} goes for the kill!", scope.owner_name()));
        }
        None
    }
}

/// Spends the owner's combo stacks for bonus damage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComboFinisher {
    pub per_stack: f64,
}

impl Default for ComboFinisher {
    fn default() -> Self {
        ComboFinisher { per_stack: 0.2 }
    }
}

impl SkillComponent for ComboFinisher {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        let stacks = scope
            .roster
            .get(scope.owner)
            .map(|c| c.effects.stacks(StatusKind::Combo))
            .unwrap_or(0);
        if stacks > 0 {
            event.add_multiplier(1.0 + self.per_stack * stacks as f64);
        }
        None
    }

    fn on_attack(&self, _event: &DamageDealtEvent, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let stacks = scope
            .roster
            .get_mut(owner)
            .map(|c| c.effects.consume_stacks(StatusKind::Combo))
            .unwrap_or(0);
        if stacks == 0 {
            return None;
        }
        Some(format!("{} unleashes a {}-hit combo!", scope.owner_name(), stacks))
    }
}

/// Bonus damage per stack of a status on the target
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusAmplify {
    pub status: StatusKind,
    pub per_stack: f64,
}

impl Default for StatusAmplify {
    fn default() -> Self {
        StatusAmplify {
            status: StatusKind::Burn,
            per_stack: 0.1,
        }
    }
}

impl SkillComponent for StatusAmplify {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        let stacks = scope
            .roster
            .get(event.target)
            .map(|c| c.effects.stacks(self.status))
            .unwrap_or(0);
        if stacks > 0 {
            event.add_multiplier(1.0 + self.per_stack * stacks as f64);
        }
        None
    }
}

/// Bonus damage on the owner's first hit of the battle
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirstStrike {
    pub multiplier: f64,
}

impl Default for FirstStrike {
    fn default() -> Self {
        FirstStrike { multiplier: 1.5 }
    }
}

impl SkillComponent for FirstStrike {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        let state = scope.state();
        if state.triggered {
            return None;
        }
        state.triggered = true;
        event.add_multiplier(self.multiplier);
        event.log(format!("{} strikes first!", scope.owner_name()));
        None
    }
}

/// Bonus damage while the owner is at or below an HP ratio
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Berserk {
    pub threshold: f64,
    pub multiplier: f64,
}

impl Default for Berserk {
    fn default() -> Self {
        Berserk {
            threshold: 0.5,
            multiplier: 1.3,
        }
    }
}

impl SkillComponent for Berserk {
    fn on_damage_calculation(
        &self,
        event: &mut DamageCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if scope.hp_ratio(scope.owner) <= self.threshold {
            event.add_multiplier(self.multiplier);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{component, skill, steady, Arena, FOE, HERO};
    use crate::status::StatusKind;
    use serde_json::json;

    #[test]
    fn test_attack_damages_target() {
        let mut arena = Arena::duel(steady(100, 100.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        let strike = skill("strike", vec![("attack", json!({}))]);
        arena.cast(HERO, &strike);
        assert_eq!(arena.hp(FOE), 900);
        assert!(arena.log.contains("Foe takes 100 damage."));
    }

    #[test]
    fn test_multi_hit_and_aoe() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        let flurry = skill("flurry", vec![("attack", json!({"hit_count": 3}))]);
        arena.cast(HERO, &flurry);
        assert_eq!(arena.hp(FOE), 970);

        let nova = skill("nova", vec![("attack", json!({"aoe": true, "ad_ratio": 2.0}))]);
        arena.cast(HERO, &nova);
        assert_eq!(arena.hp(FOE), 950);
    }

    #[test]
    fn test_attack_on_dead_target_fizzles() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        arena.roster.get_mut(FOE).unwrap().stats.hp = 0;
        let strike = skill("strike", vec![("attack", json!({}))]);
        arena.cast(HERO, &strike);
        assert!(arena.log.contains("has no effect"));
    }

    #[test]
    fn test_forced_crit_with_override() {
        let mut arena = Arena::duel(steady(100, 100.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        let smite = skill(
            "smite",
            vec![
                ("crit", json!({"force": true, "damage": 3.0})),
                ("attack", json!({})),
            ],
        );
        arena.cast(HERO, &smite);
        assert_eq!(arena.hp(FOE), 700);
        assert!(arena.log.contains("Critical hit"));
    }

    #[test]
    fn test_execute_below_threshold() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        arena.roster.get_mut(FOE).unwrap().stats.hp = 200;
        let finisher = skill(
            "finisher",
            vec![("execute", json!({})), ("attack", json!({}))],
        );
        arena.cast(HERO, &finisher);
        assert_eq!(arena.hp(FOE), 180);
    }

    #[test]
    fn test_first_strike_once_per_battle() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        let ambush = skill(
            "ambush",
            vec![("first_strike", json!({"multiplier": 2.0})), ("attack", json!({}))],
        );
        arena.cast(HERO, &ambush);
        assert_eq!(arena.hp(FOE), 980);
        arena.cast(HERO, &ambush);
        assert_eq!(arena.hp(FOE), 970);
    }

    #[test]
    fn test_combo_finisher_consumes_stacks() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        let config = arena.rules.catalog.config_or_default(StatusKind::Combo);
        arena
            .roster
            .get_mut(HERO)
            .unwrap()
            .effects
            .apply_status(&config, 5, 99, Some(HERO));

        let finisher = skill(
            "finisher",
            vec![("combo_finisher", json!({"per_stack": 0.2})), ("attack", json!({}))],
        );
        arena.cast(HERO, &finisher);
        assert_eq!(arena.hp(FOE), 980);
        assert_eq!(
            arena.roster.get(HERO).unwrap().effects.stacks(StatusKind::Combo),
            0
        );
    }

    #[test]
    fn test_true_strike_never_misses() {
        let mut hero = steady(100, 10.0);
        hero.accuracy = 0.0;
        let mut foe = steady(1000, 10.0);
        foe.evasion = 500.0;
        let mut arena = Arena::duel(hero, foe);
        let sure = skill("sure", vec![("true_strike", json!({})), ("attack", json!({}))]);
        for _ in 0..10 {
            arena.cast(HERO, &sure);
        }
        assert!(!arena.log.contains("misses"));
        assert!(arena.hp(FOE) < 1000);
    }

    #[test]
    fn test_penetration_ignores_defense() {
        let mut foe = steady(1000, 10.0);
        foe.defense = 100.0;
        let mut arena = Arena::duel(steady(100, 100.0), foe);
        arena.rules.constants.damage.variance = 0.0;
        let pierce = skill(
            "pierce",
            vec![("penetration", json!({"armor_pen": 0.5})), ("attack", json!({}))],
        );
        arena.cast(HERO, &pierce);
        // 100 - floor(100 * 0.5 * 0.5)
        assert_eq!(arena.hp(FOE), 925);
    }

    #[test]
    fn test_status_amplify_config() {
        let bound = component("status_amplify", json!({"status": "poison", "per_stack": 0.05}));
        assert_eq!(bound.tag, "status_amplify");
    }

    #[test]
    fn test_defense_ignore_reduces_mitigation() {
        let mut foe = steady(1000, 10.0);
        foe.defense = 100.0;
        let mut arena = Arena::duel(steady(100, 100.0), foe);
        arena.rules.constants.damage.variance = 0.0;

        let strike = skill("strike", vec![("attack", json!({}))]);
        arena.cast(HERO, &strike);
        assert_eq!(arena.hp(FOE), 950);

        // 100 - floor(100 * 0.6 * 0.5) = 70
        let pierce = skill(
            "pierce",
            vec![
                ("penetration", json!({"defense_ignore": 0.4})),
                ("attack", json!({})),
            ],
        );
        arena.cast(HERO, &pierce);
        assert_eq!(arena.hp(FOE), 880);
    }

    #[test]
    fn test_crit_rate_fields_both_apply() {
        let mut arena = Arena::duel(steady(100, 100.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        arena.rules.constants.crit.rate_cap = 1.0;
        let sure = skill(
            "sure",
            vec![
                ("crit", json!({"rate": 0.5, "rate_bonus": 0.5, "damage": 2.0})),
                ("attack", json!({})),
            ],
        );
        for _ in 0..5 {
            arena.cast(HERO, &sure);
        }
        assert_eq!(arena.hp(FOE), 0);
    }
}
