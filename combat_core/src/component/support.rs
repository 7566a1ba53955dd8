//! Support components - healing, shields, buffs and cleansing

use super::SkillComponent;
use crate::context::ActionScope;
use crate::event::DamageDealtEvent;
use crate::status::{Buff, BuffKind};
use serde::Deserialize;

/// Restore the owner's HP: a share of max HP plus stat scaling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Heal {
    pub percent: f64,
    pub ad_ratio: f64,
    pub ap_ratio: f64,
    pub flat: f64,
}

impl Default for Heal {
    fn default() -> Self {
        Heal {
            percent: 0.15,
            ad_ratio: 0.0,
            ap_ratio: 0.0,
            flat: 0.0,
        }
    }
}

impl SkillComponent for Heal {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let snapshot = match scope.snapshot(owner) {
            Ok(snapshot) => snapshot,
            Err(err) => return scope.recover(err),
        };
        let amount = snapshot.max_hp() as f64 * self.percent
            + snapshot.attack() * self.ad_ratio
            + snapshot.ap_attack() * self.ap_ratio
            + self.flat;
        let amount = amount * scope.synergy_bonus(owner).heal;
        match scope.heal(owner, amount) {
            Ok(healed) => Some(format!("{} recovers {} HP.", scope.owner_name(), healed)),
            Err(err) => scope.recover(err),
        }
    }
}

/// Grant the owner a damage-absorbing shield
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Shield {
    pub percent: f64,
    pub flat: f64,
    pub duration: u32,
}

impl Default for Shield {
    fn default() -> Self {
        Shield {
            percent: 0.1,
            flat: 0.0,
            duration: 2,
        }
    }
}

impl SkillComponent for Shield {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let max_hp = match scope.snapshot(owner) {
            Ok(snapshot) => snapshot.max_hp(),
            Err(err) => return scope.recover(err),
        };
        let amount =
            ((max_hp as f64 * self.percent + self.flat) * scope.synergy_bonus(owner).shield).floor();
        if amount < 1.0 {
            return None;
        }
        let buff = Buff::shield(amount, self.duration, scope.skill_name());
        match scope.apply_buff(owner, buff) {
            Ok(()) => Some(format!(
                "{} gains a {}-point shield.",
                scope.owner_name(),
                amount
            )),
            Err(err) => scope.recover(err),
        }
    }
}

/// Remove harmful effects from the owner
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cleanse {
    pub count: usize,
}

impl Default for Cleanse {
    fn default() -> Self {
        Cleanse { count: 1 }
    }
}

impl SkillComponent for Cleanse {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let removed = scope
            .roster
            .get_mut(owner)
            .map(|c| c.effects.cleanse(self.count))
            .unwrap_or_default();
        if removed.is_empty() {
            return None;
        }
        Some(format!(
            "{} is cleansed of {}.",
            scope.owner_name(),
            removed.join(", ")
        ))
    }
}

/// Strip beneficial buffs from the target
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dispel {
    pub count: usize,
}

impl Default for Dispel {
    fn default() -> Self {
        Dispel { count: 1 }
    }
}

impl SkillComponent for Dispel {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let target = match scope.target() {
            Ok(target) => target,
            Err(err) => return scope.recover(err),
        };
        let removed = scope
            .roster
            .get_mut(target)
            .map(|c| c.effects.dispel(self.count))
            .unwrap_or_default();
        if removed.is_empty() {
            return None;
        }
        Some(format!(
            "{} dispels {} from {}.",
            scope.owner_name(),
            removed.join(", "),
            scope.name_of(target)
        ))
    }
}

/// Flat stat amounts shared by buff and debuff skills
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatAmounts {
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub crit_rate: f64,
    pub ap_attack: f64,
    pub ap_defense: f64,
    pub evasion: f64,
}

impl StatAmounts {
    fn entries(&self) -> impl Iterator<Item = (BuffKind, f64)> {
        [
            (BuffKind::Attack, self.attack),
            (BuffKind::Defense, self.defense),
            (BuffKind::Speed, self.speed),
            (BuffKind::CritRate, self.crit_rate),
            (BuffKind::ApAttack, self.ap_attack),
            (BuffKind::ApDefense, self.ap_defense),
            (BuffKind::Evasion, self.evasion),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount != 0.0)
    }
}

fn default_duration() -> u32 {
    2
}

/// Timed flat stat bonuses on the owner
#[derive(Debug, Clone, Deserialize)]
pub struct BuffSkill {
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(flatten)]
    pub stats: StatAmounts,
}

impl Default for BuffSkill {
    fn default() -> Self {
        BuffSkill {
            duration: default_duration(),
            stats: StatAmounts::default(),
        }
    }
}

impl SkillComponent for BuffSkill {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let source = scope.skill_name();
        let mut parts = Vec::new();
        for (kind, amount) in self.stats.entries() {
            let buff = Buff::new(kind, amount, self.duration, source.clone());
            parts.push(buff.describe());
            if let Err(err) = scope.apply_buff(owner, buff) {
                return scope.recover(err);
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(format!("{} gains {}.", scope.owner_name(), parts.join(", ")))
    }
}

/// Timed flat stat penalties on the target; amounts are magnitudes
#[derive(Debug, Clone, Deserialize)]
pub struct DebuffSkill {
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(flatten)]
    pub stats: StatAmounts,
}

impl Default for DebuffSkill {
    fn default() -> Self {
        DebuffSkill {
            duration: default_duration(),
            stats: StatAmounts::default(),
        }
    }
}

impl SkillComponent for DebuffSkill {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let target = match scope.target() {
            Ok(target) => target,
            Err(err) => return scope.recover(err),
        };
        let source = scope.skill_name();
        let mut parts = Vec::new();
        for (kind, amount) in self.stats.entries() {
            let buff = Buff::debuff(kind, -amount.abs(), self.duration, source.clone());
            parts.push(buff.describe());
            if let Err(err) = scope.apply_buff(target, buff) {
                return scope.recover(err);
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(format!("{} suffers {}.", scope.name_of(target), parts.join(", ")))
    }
}

/// Heal for a share of the damage the owner lands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Lifesteal {
    pub percent: f64,
}

impl Default for Lifesteal {
    fn default() -> Self {
        Lifesteal { percent: 0.1 }
    }
}

impl SkillComponent for Lifesteal {
    fn on_deal_damage(
        &self,
        event: &mut DamageDealtEvent,
        scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        if event.attacker != scope.owner || event.landed() <= 0 {
            return None;
        }
        let amount = (event.landed() as f64 * self.percent).floor();
        match scope.heal(scope.owner, amount) {
            Ok(healed) if healed > 0 => {
                Some(format!("{} drains {} HP.", scope.owner_name(), healed))
            }
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}

/// Fixed damage equal to a share of the target's max HP, healed back
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Drain {
    pub percent: f64,
}

impl Default for Drain {
    fn default() -> Self {
        Drain { percent: 0.05 }
    }
}

impl SkillComponent for Drain {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let target = match scope.target() {
            Ok(target) => target,
            Err(err) => return scope.recover(err),
        };
        let max_hp = match scope.snapshot(target) {
            Ok(snapshot) => snapshot.max_hp(),
            Err(err) => return scope.recover(err),
        };
        let amount = ((max_hp as f64 * self.percent).floor() as i64).max(1);
        scope.log.push(format!(
            "{} drains life from {}.",
            scope.owner_name(),
            scope.name_of(target)
        ));
        let attribute = scope.skill_attribute();
        let result = match scope.deal_fixed_damage(target, amount, attribute) {
            Ok(result) => result,
            Err(err) => return scope.recover(err),
        };
        match scope.heal(scope.owner, result.landed() as f64) {
            Ok(healed) if healed > 0 => {
                Some(format!("{} recovers {} HP.", scope.owner_name(), healed))
            }
            Ok(_) => None,
            Err(err) => scope.recover(err),
        }
    }
}

/// The owner takes no damage for a few rounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Invulnerable {
    pub duration: u32,
}

impl Default for Invulnerable {
    fn default() -> Self {
        Invulnerable { duration: 1 }
    }
}

impl SkillComponent for Invulnerable {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let owner = scope.owner;
        let buff = Buff::new(BuffKind::Invulnerable, 1.0, self.duration, scope.skill_name());
        match scope.apply_buff(owner, buff) {
            Ok(()) => Some(format!("{} becomes invulnerable!", scope.owner_name())),
            Err(err) => scope.recover(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{skill, steady, Arena, FOE, HERO};
    use crate::status::{Buff, BuffKind, StatusKind};
    use serde_json::json;

    #[test]
    fn test_heal_caps_at_max_hp() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        arena.roster.get_mut(HERO).unwrap().stats.hp = 50;
        let mend = skill("mend", vec![("heal", json!({"percent": 0.3}))]);
        arena.cast(HERO, &mend);
        assert_eq!(arena.hp(HERO), 80);
        arena.cast(HERO, &mend);
        assert_eq!(arena.hp(HERO), 100);
        assert!(arena.log.contains("Hero recovers 20 HP."));
    }

    #[test]
    fn test_shield_absorbs_before_hp() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        let barrier = skill("barrier", vec![("shield", json!({"percent": 0.2}))]);
        arena.cast(HERO, &barrier);
        let shield = arena.roster.get(HERO).unwrap().effects.shield_total();
        assert_eq!(shield, 20);
    }

    #[test]
    fn test_buff_and_debuff_amounts() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        let rally = skill("rally", vec![("buff", json!({"attack": 5.0, "duration": 3}))]);
        arena.cast(HERO, &rally);
        let snapshot = arena.roster.snapshot(HERO).unwrap();
        assert!((snapshot.attack() - 15.0).abs() < f64::EPSILON);

        let weaken = skill("weaken", vec![("debuff", json!({"attack": 4.0}))]);
        arena.cast(HERO, &weaken);
        let foe = arena.roster.snapshot(FOE).unwrap();
        assert!((foe.attack() - 6.0).abs() < f64::EPSILON);
        assert!(arena.roster.get(FOE).unwrap().effects.has_debuff());
    }

    #[test]
    fn test_cleanse_and_dispel() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 10.0));
        let poison = arena.rules.catalog.config_or_default(StatusKind::Poison);
        arena
            .roster
            .get_mut(HERO)
            .unwrap()
            .effects
            .apply_status(&poison, 2, 3, Some(FOE));
        arena
            .roster
            .get_mut(FOE)
            .unwrap()
            .effects
            .apply_buff(Buff::new(BuffKind::Defense, 10.0, 3, "Harden"));

        let purify = skill(
            "purify",
            vec![("cleanse", json!({})), ("dispel", json!({"count": 2}))],
        );
        arena.cast(HERO, &purify);
        assert!(!arena.roster.get(HERO).unwrap().effects.has_status(StatusKind::Poison));
        assert!(arena.roster.get(FOE).unwrap().effects.buffs().is_empty());
        assert!(arena.log.contains("cleansed of Poison"));
    }

    #[test]
    fn test_lifesteal_heals_from_landed_damage() {
        let mut arena = Arena::duel(steady(100, 50.0), steady(1000, 10.0));
        arena.rules.constants.damage.variance = 0.0;
        arena.roster.get_mut(HERO).unwrap().stats.hp = 50;
        let bite = skill(
            "bite",
            vec![("attack", json!({})), ("lifesteal", json!({"percent": 0.5}))],
        );
        arena.cast(HERO, &bite);
        assert_eq!(arena.hp(FOE), 950);
        assert_eq!(arena.hp(HERO), 75);
    }

    #[test]
    fn test_drain_is_fixed_damage() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        arena.roster.get_mut(HERO).unwrap().stats.hp = 10;
        let siphon = skill("siphon", vec![("drain", json!({"percent": 0.05}))]);
        arena.cast(HERO, &siphon);
        assert_eq!(arena.hp(FOE), 950);
        assert_eq!(arena.hp(HERO), 60);
    }

    #[test]
    fn test_invulnerable_blocks_damage() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(100, 50.0));
        let aegis = skill("aegis", vec![("invulnerable", json!({}))]);
        arena.cast(HERO, &aegis);
        let strike = skill("strike", vec![("attack", json!({}))]);
        arena.cast(FOE, &strike);
        assert_eq!(arena.hp(HERO), 100);
        assert!(arena.log.contains("invulnerable"));
    }
}
