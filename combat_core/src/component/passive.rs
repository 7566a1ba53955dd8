//! Passive components - always-on modifiers and reactive triggers
//!
//! These live on passive deck slots and equipment, so they never run
//! `on_turn`; everything here is a stat modifier or a reaction.

use super::SkillComponent;
use crate::context::ActionScope;
use crate::event::{DamageDealtEvent, HitCalculationEvent, TakeDamageEvent};
use crate::skill::Skill;
use crate::stats::{StatAccumulator, StatKind};
use crate::status::{Buff, BuffKind};
use crate::types::Element;
use serde::Deserialize;

/// Duration for buffs meant to last the whole encounter
const BATTLE_LONG: u32 = 99;

/// Permanent percentage and flat stat bonuses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PassiveBuff {
    pub attack_percent: f64,
    pub defense_percent: f64,
    pub speed_percent: f64,
    pub max_hp_percent: f64,
    /// Older name for `max_hp_percent`; both are summed
    pub hp_percent: f64,
    pub ap_attack_percent: f64,
    pub ap_defense_percent: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub lifesteal: f64,
    pub drop_rate: f64,
    pub evasion: f64,
    pub accuracy: f64,
}

impl SkillComponent for PassiveBuff {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        let increased = [
            (StatKind::Attack, self.attack_percent),
            (StatKind::Defense, self.defense_percent),
            (StatKind::Speed, self.speed_percent),
            (StatKind::MaxHp, self.max_hp_percent + self.hp_percent),
            (StatKind::ApAttack, self.ap_attack_percent),
            (StatKind::ApDefense, self.ap_defense_percent),
        ];
        for (kind, value) in increased {
            if value != 0.0 {
                stats.add_increased(kind, value);
            }
        }

        let flat = [
            (StatKind::CritRate, self.crit_rate),
            (StatKind::CritDamage, self.crit_damage),
            (StatKind::Lifesteal, self.lifesteal),
            (StatKind::DropRate, self.drop_rate),
            (StatKind::Evasion, self.evasion),
            (StatKind::Accuracy, self.accuracy),
        ];
        for (kind, value) in flat {
            if value != 0.0 {
                stats.add_flat(kind, value);
            }
        }
    }
}

/// Heal a share of max HP at the start of each of the owner's turns
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassiveRegen {
    pub percent: f64,
    pub flat: f64,
}

impl Default for PassiveRegen {
    fn default() -> Self {
        PassiveRegen {
            percent: 0.05,
            flat: 0.0,
        }
    }
}

impl SkillComponent for PassiveRegen {
    fn on_turn_start(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let max_hp = match scope.snapshot(owner).map(|value| value.max_hp()) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        let amount = max_hp as f64 * self.percent + self.flat;
        match scope.heal(owner, amount) {
            Ok(healed) if healed > 0 => {
                Some(format!("{} regenerates {} HP.", scope.owner_name(), healed))
            }
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}

/// Refresh a shield every few turns, starting with the first
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassiveShield {
    pub percent: f64,
    pub duration: u32,
    pub interval: u32,
}

impl Default for PassiveShield {
    fn default() -> Self {
        PassiveShield {
            percent: 0.1,
            duration: 2,
            interval: 3,
        }
    }
}

impl SkillComponent for PassiveShield {
    fn on_turn_start(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let state = scope.state();
        state.turns += 1;
        if (state.turns - 1) % self.interval.max(1) != 0 {
            return None;
        }
        let owner = scope.owner;
        let max_hp = match scope.snapshot(owner).map(|value| value.max_hp()) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        let amount = (max_hp as f64 * self.percent * scope.synergy_bonus(owner).shield).floor();
        if amount < 1.0 {
            return None;
        }
        let buff = Buff::shield(amount, self.duration, scope.skill_name());
        match scope.apply_buff(owner, buff) {
            Ok(()) => Some(format!(
                "{}'s {} grants a {}-point shield.",
                scope.owner_name(),
                scope.skill_name(),
                amount
            )),
            Err(err) => scope.recover(err),
        }
    }
}

/// Fixed damage back at whoever lands a hit on the owner
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thorns {
    pub flat: f64,
    pub percent: f64,
}

impl Default for Thorns {
    fn default() -> Self {
        Thorns {
            flat: 0.0,
            percent: 0.1,
        }
    }
}

impl SkillComponent for Thorns {
    fn on_damaged(&self, event: &DamageDealtEvent, scope: &mut ActionScope<'_>) -> Option<String> {
        if event.target != scope.owner || event.landed() <= 0 || !scope.is_alive(event.attacker) {
            return None;
        }
        let amount = ((self.flat + event.landed() as f64 * self.percent).floor() as i64).max(1);
        scope.log.push(format!(
            "{} is pricked by {}'s thorns.",
            scope.name_of(event.attacker),
            scope.owner_name()
        ));
        match scope.deal_fixed_damage(event.attacker, amount, Element::Neutral) {
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}

/// Share of HP lost that bounces back at the attacker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Reflect {
    pub percent: f64,
}

impl Default for Reflect {
    fn default() -> Self {
        Reflect { percent: 0.1 }
    }
}

impl SkillComponent for Reflect {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        stats.add_flat(StatKind::Reflect, self.percent);
    }
}

/// Come back from a killing blow with a share of max HP
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Revive {
    pub hp_percent: f64,
    pub uses: u32,
}

impl Default for Revive {
    fn default() -> Self {
        Revive {
            hp_percent: 0.3,
            uses: 1,
        }
    }
}

impl SkillComponent for Revive {
    fn on_death(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        if scope.is_alive(owner) {
            return None;
        }
        let state = scope.state();
        if state.uses >= self.uses {
            return None;
        }
        state.uses += 1;

        let max_hp = match scope.snapshot(owner).map(|value| value.max_hp()) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        let hp = ((max_hp as f64 * self.hp_percent).floor() as i64).clamp(1, max_hp);
        match scope.roster.require_mut(owner) {
            Ok(combatant) => combatant.stats.hp = hp,
            Err(err) => return scope.recover(err),
        }
        Some(format!("{} is revived with {} HP!", scope.owner_name(), hp))
    }
}

/// Attack grows by a flat amount every turn, up to a cap
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TurnScaling {
    pub attack_per_turn: f64,
    pub max_stacks: u32,
}

impl Default for TurnScaling {
    fn default() -> Self {
        TurnScaling {
            attack_per_turn: 2.0,
            max_stacks: 5,
        }
    }
}

impl SkillComponent for TurnScaling {
    fn on_turn_start(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let state = scope.state();
        if state.stacks >= self.max_stacks {
            return None;
        }
        state.stacks += 1;
        let stacks = state.stacks;

        let owner = scope.owner;
        let amount = self.attack_per_turn * stacks as f64;
        let buff = Buff::new(BuffKind::Attack, amount, BATTLE_LONG, scope.skill_name());
        match scope.apply_buff(owner, buff) {
            Ok(()) => Some(format!(
                "{}'s power grows (x{}).",
                scope.owner_name(),
                stacks
            )),
            Err(err) => scope.recover(err),
        }
    }
}

/// Chance to strike back when hit
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterStance {
    pub chance: f64,
    /// Share of the owner's attack dealt as fixed damage
    pub ratio: f64,
}

impl Default for CounterStance {
    fn default() -> Self {
        CounterStance {
            chance: 0.3,
            ratio: 0.5,
        }
    }
}

impl SkillComponent for CounterStance {
    fn on_damaged(&self, event: &DamageDealtEvent, scope: &mut ActionScope<'_>) -> Option<String> {
        if event.target != scope.owner || !scope.is_alive(event.attacker) {
            return None;
        }
        if !scope.chance(self.chance) {
            return None;
        }
        let attack = match scope.snapshot(scope.owner).map(|value| value.attack()) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        let amount = ((attack * self.ratio).floor() as i64).max(1);
        scope.log.push(format!("{} counterattacks!", scope.owner_name()));
        match scope.deal_fixed_damage(event.attacker, amount, Element::Neutral) {
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}

/// Extra evasion, more of it while the owner is at low HP
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvasionBoost {
    pub evasion: f64,
    pub low_hp_bonus: f64,
}

impl Default for EvasionBoost {
    fn default() -> Self {
        EvasionBoost {
            evasion: 10.0,
            low_hp_bonus: 20.0,
        }
    }
}

impl SkillComponent for EvasionBoost {
    fn on_hit_calculation(
        &self,
        event: &mut HitCalculationEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if event.target != scope.owner {
            return None;
        }
        event.evasion_bonus += self.evasion;
        if scope.is_low_hp(scope.owner) {
            event.evasion_bonus += self.low_hp_bonus;
        }
        None
    }
}

/// Take less damage while at or below an HP ratio
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LastStand {
    pub threshold: f64,
    pub reduction: f64,
}

impl Default for LastStand {
    fn default() -> Self {
        LastStand {
            threshold: 0.3,
            reduction: 0.3,
        }
    }
}

impl SkillComponent for LastStand {
    fn on_take_damage(
        &self,
        event: &mut TakeDamageEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if event.target != scope.owner || scope.hp_ratio(scope.owner) > self.threshold {
            return None;
        }
        event.scale(1.0 - self.reduction.clamp(0.0, 1.0));
        Some(format!("{} makes a last stand!", scope.owner_name()))
    }
}

/// Short attack bonus whenever a skill with a keyword is drawn
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawBoost {
    /// Empty matches every skill
    pub keyword: String,
    pub attack_percent: f64,
}

impl Default for DrawBoost {
    fn default() -> Self {
        DrawBoost {
            keyword: String::new(),
            attack_percent: 0.1,
        }
    }
}

impl SkillComponent for DrawBoost {
    fn on_draw_skill(&self, skill: &Skill, scope: &mut ActionScope<'_>) -> Option<String> {
        if !self.keyword.is_empty() && !skill.has_keyword(&self.keyword) {
            return None;
        }
        let owner = scope.owner;
        let base = match scope.combatant(owner).map(|value| value.stats.attack) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        let amount = (base * self.attack_percent).floor();
        if amount <= 0.0 {
            return None;
        }
        let buff = Buff::new(BuffKind::Attack, amount, 1, scope.skill_name());
        match scope.apply_buff(owner, buff) {
            Ok(()) => Some(format!(
                "{} is empowered by drawing {}.",
                scope.owner_name(),
                skill.name
            )),
            Err(err) => scope.recover(err),
        }
    }
}

/// Heal after a won battle
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VictoryHeal {
    pub percent: f64,
}

impl Default for VictoryHeal {
    fn default() -> Self {
        VictoryHeal { percent: 0.1 }
    }
}

impl SkillComponent for VictoryHeal {
    fn on_combat_end(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        if !scope.is_alive(owner) || !scope.enemies().is_empty() {
            return None;
        }
        let max_hp = match scope.snapshot(owner).map(|value| value.max_hp()) {
            Ok(value) => value,
            Err(err) => return scope.recover(err),
        };
        match scope.heal(owner, max_hp as f64 * self.percent) {
            Ok(healed) if healed > 0 => Some(format!(
                "{} recovers {} HP after the battle.",
                scope.owner_name(),
                healed
            )),
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}
