//! Attack resolution - hit roll, damage formula, pipeline, reactions
//!
//! Order:
//! 1. Hit calculation (attacker, then target hooks), then the hit roll
//! 2. Damage calculation hooks, formula, crit, variance
//! 3. Target's take-damage hooks
//! 4. Damage pipeline
//! 5. Deal-damage hooks and lifesteal
//! 6. On-attack hooks, then the target's on-damaged hooks

use super::ActionScope;
use crate::error::StateError;
use crate::event::{DamageCalculationEvent, DamageDealtEvent, HitCalculationEvent, TakeDamageEvent};
use crate::math;
use crate::pipeline::{self, DamageRequest};
use crate::stats::StatSnapshot;
use crate::synergy::SynergyBonus;
use crate::types::{Element, EntityHandle};
use tracing::debug;

/// Parameters of one formula-driven hit
#[derive(Debug, Clone, PartialEq)]
pub struct AttackSpec {
    pub target: EntityHandle,
    pub attribute: Element,
    pub ad_ratio: f64,
    pub ap_ratio: f64,
    pub is_physical: bool,
    pub armor_pen: f64,
    pub crit_bonus: f64,
}

impl AttackSpec {
    /// Plain physical hit scaling with attack
    pub fn physical(target: EntityHandle, attribute: Element, ad_ratio: f64) -> Self {
        AttackSpec {
            target,
            attribute,
            ad_ratio,
            ap_ratio: 0.0,
            is_physical: true,
            armor_pen: 0.0,
            crit_bonus: 0.0,
        }
    }
}

/// What one attack did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackOutcome {
    pub hit: bool,
    pub is_crit: bool,
    /// Damage handed to the pipeline
    pub raw: i64,
    /// HP the target lost
    pub damage: i64,
    pub absorbed: i64,
    pub target_died: bool,
}

fn is_neutral(multiplier: f64) -> bool {
    (multiplier - 1.0).abs() < 1e-9
}

impl ActionScope<'_> {
    /// Resolve a single hit from the owner against `spec.target`
    pub fn attack(&mut self, spec: &AttackSpec) -> Result<AttackOutcome, StateError> {
        let attacker = self.owner;
        let target = spec.target;
        let attacker_name = self.roster.require_living(attacker)?.name.clone();
        let defender = self.roster.require_living(target)?;
        let target_name = defender.name.clone();
        let target_attribute = defender.attribute;
        let skill_name = self.skill_name();

        let offense = self.snapshot(attacker)?;
        let defense = self.snapshot(target)?;
        let synergy = self.synergy_bonus(attacker);

        // 1. hit
        let mut hit = HitCalculationEvent::new(attacker, target, offense.accuracy(), defense.evasion());
        self.dispatch_offense(attacker, |c, s| c.on_hit_calculation(&mut hit, s));
        self.dispatch_passives(target, |c, s| c.on_hit_calculation(&mut hit, s));
        if !hit.force_hit {
            let rules = self.rules;
            let landed = math::roll_hit(
                &rules.constants.hit,
                hit.accuracy + hit.accuracy_bonus,
                hit.evasion + hit.evasion_bonus,
                &mut *self.rng,
            );
            if !landed {
                self.log
                    .push(format!("{}'s {} misses {}!", attacker_name, skill_name, target_name));
                return Ok(AttackOutcome::default());
            }
        }

        // 2. damage calculation
        let base = offense.attack() * spec.ad_ratio + offense.ap_attack() * spec.ap_ratio;
        let mut calc = DamageCalculationEvent::new(
            attacker,
            target,
            skill_name.clone(),
            spec.attribute,
            base,
            spec.is_physical,
        );
        calc.armor_pen = spec.armor_pen;
        calc.crit_rate_bonus = spec.crit_bonus;
        for multiplier in [synergy.damage, offense.damage_dealt(), defense.damage_taken()] {
            if !is_neutral(multiplier) {
                calc.add_multiplier(multiplier);
            }
        }
        self.dispatch_offense(attacker, |c, s| c.on_damage_calculation(&mut calc, s));
        let raw = self.roll_damage(&mut calc, &offense, &defense, target_attribute, &synergy);
        self.log.extend(calc.logs.drain(..));
        debug!(%attacker, %target, raw, crit = calc.is_crit, "damage calculated");

        // 3. incoming hooks
        let mut take = TakeDamageEvent::new(target, Some(attacker), raw, calc.attribute, false);
        self.dispatch_passives(target, |c, s| c.on_take_damage(&mut take, s));
        if take.negated {
            self.log.push(format!("{} negates the blow!", target_name));
            return Ok(AttackOutcome {
                hit: true,
                is_crit: calc.is_crit,
                raw,
                ..AttackOutcome::default()
            });
        }

        // 4. pipeline
        if calc.is_crit {
            self.log.push(format!("Critical hit on {}!", target_name));
        }
        let request = DamageRequest::new(target, take.damage, take.attribute).from_attacker(attacker);
        let result = pipeline::process_incoming_damage(self.roster, &request, &self.rules.constants)?;
        self.log.extend(result.logs.iter().cloned());

        let outcome = AttackOutcome {
            hit: true,
            is_crit: calc.is_crit,
            raw: take.damage,
            damage: result.actual,
            absorbed: result.absorbed,
            target_died: result.target_died,
        };

        // 5. deal-damage hooks and lifesteal
        let mut dealt = DamageDealtEvent {
            attacker,
            target,
            skill_name,
            attribute: take.attribute,
            raw: take.damage,
            damage: result.actual,
            absorbed: result.absorbed,
            is_crit: calc.is_crit,
            target_died: result.target_died,
        };
        if !self.is_alive(attacker) {
            return Ok(outcome);
        }
        self.dispatch_offense(attacker, |c, s| c.on_deal_damage(&mut dealt, s));

        let lifesteal = offense.lifesteal();
        if lifesteal > 0.0 && dealt.landed() > 0 && self.is_alive(attacker) {
            let healed = self.heal(attacker, (dealt.landed() as f64 * lifesteal).floor())?;
            if healed > 0 {
                self.log.push(format!("{} drains {} HP.", attacker_name, healed));
            }
        }

        // 6. reactions
        if self.is_alive(attacker) {
            self.dispatch_offense(attacker, |c, s| c.on_attack(&dealt, s));
        }
        if self.is_alive(target) {
            self.dispatch_passives(target, |c, s| c.on_damaged(&dealt, s));
        }

        Ok(outcome)
    }

    fn roll_damage(
        &mut self,
        calc: &mut DamageCalculationEvent,
        offense: &StatSnapshot,
        defense: &StatSnapshot,
        target_attribute: Element,
        synergy: &SynergyBonus,
    ) -> i64 {
        let rules = self.rules;
        let constants = &rules.constants;
        let (defense_value, ratio) = if calc.is_physical {
            (defense.defense(), constants.damage.physical_defense_ratio)
        } else {
            (defense.ap_defense(), constants.damage.magical_defense_ratio)
        };
        let attribute_multiplier = math::attribute_multiplier(
            &constants.damage,
            calc.attribute,
            target_attribute,
            offense.elemental_damage.get(calc.attribute),
        );
        let mut damage = math::mitigated_damage(
            &constants.damage,
            calc.base_damage,
            defense_value,
            calc.total_multiplier(),
            attribute_multiplier,
            calc.total_penetration(),
            ratio,
        );

        let rate = (offense.crit_rate() + calc.crit_rate_bonus) * synergy.crit_rate;
        calc.is_crit = calc.force_crit || math::roll_crit(&constants.crit, rate, &mut *self.rng);
        if calc.is_crit {
            let multiplier =
                math::crit_multiplier(&constants.crit, calc.crit_multiplier) + offense.crit_damage();
            damage = ((damage as f64 * multiplier).floor() as i64).max(constants.damage.min_damage);
        }

        math::apply_variance(&constants.damage, damage, &mut *self.rng)
    }
}
