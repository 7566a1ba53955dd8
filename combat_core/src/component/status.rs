//! Status components - afflictions and combo stacks

use super::SkillComponent;
use crate::context::ActionScope;
use crate::event::DamageDealtEvent;
use crate::status::StatusKind;
use crate::types::EntityHandle;
use serde::Deserialize;

/// Apply a status effect, on hit or when cast
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplyStatus {
    pub status: StatusKind,
    pub stacks: u32,
    /// Falls back to the status type's default duration
    pub duration: Option<u32>,
    pub chance: f64,
    /// Apply when one of the owner's hits lands instead of on cast
    pub on_hit: bool,
    pub target_self: bool,
}

impl Default for ApplyStatus {
    fn default() -> Self {
        ApplyStatus {
            status: StatusKind::Burn,
            stacks: 1,
            duration: None,
            chance: 1.0,
            on_hit: true,
            target_self: false,
        }
    }
}

impl ApplyStatus {
    fn afflict(&self, scope: &mut ActionScope<'_>, target: EntityHandle) -> Option<String> {
        if !scope.is_alive(target) || !scope.chance(self.chance) {
            return None;
        }
        match scope.apply_status(target, self.status, self.stacks, self.duration) {
            Ok(0) => None,
            Ok(stacks) => {
                let name = scope.rules.catalog.config_or_default(self.status).name;
                Some(format!(
                    "{} is afflicted with {} (x{}).",
                    scope.name_of(target),
                    name,
                    stacks
                ))
            }
            Err(err) => scope.recover(err),
        }
    }
}

impl SkillComponent for ApplyStatus {
    fn on_turn(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        if self.target_self {
            let owner = scope.owner;
            return self.afflict(scope, owner);
        }
        if self.on_hit {
            return None;
        }
        match scope.target() {
            Ok(target) => self.afflict(scope, target),
            Err(err) => scope.recover(err),
        }
    }

    fn on_attack(&self, event: &DamageDealtEvent, scope: &mut ActionScope<'_>) -> Option<String> {
        if self.target_self || !self.on_hit || event.attacker != scope.owner {
            return None;
        }
        self.afflict(scope, event.target)
    }
}

/// Build combo stacks on the owner with every landed hit
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComboBuilder {
    pub stacks: u32,
}

impl Default for ComboBuilder {
    fn default() -> Self {
        ComboBuilder { stacks: 1 }
    }
}

impl SkillComponent for ComboBuilder {
    fn on_attack(&self, event: &DamageDealtEvent, scope: &mut ActionScope<'_>) -> Option<String> {
        if event.attacker != scope.owner {
            return None;
        }
        let owner = scope.owner;
        match scope.apply_status(owner, StatusKind::Combo, self.stacks, None) {
            Ok(0) => None,
            Ok(total) => Some(format!("{} builds combo (x{}).", scope.owner_name(), total)),
            Err(err) => scope.recover(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{skill, steady, Arena, FOE, HERO};
    use crate::status::StatusKind;
    use serde_json::json;

    #[test]
    fn test_status_on_hit() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        let ignite = skill(
            "ignite",
            vec![
                ("attack", json!({})),
                ("status", json!({"status": "burn", "stacks": 2, "duration": 3})),
            ],
        );
        arena.cast(HERO, &ignite);
        arena.cast(HERO, &ignite);
        let foe = arena.roster.get(FOE).unwrap();
        let burn = foe.effects.status(StatusKind::Burn).unwrap();
        assert_eq!(burn.stacks, 4);
        assert_eq!(burn.duration, 3);
        assert!(arena.log.contains("Foe is afflicted with Burn (x4)."));
    }

    #[test]
    fn test_zero_duration_stun_does_not_land() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        let bash = skill(
            "bash",
            vec![("status", json!({"status": "stun", "duration": 0, "on_hit": false}))],
        );
        arena.cast(HERO, &bash);
        let foe = arena.roster.get(FOE).unwrap();
        assert!(!foe.effects.has_status(StatusKind::Stun));
        assert!(foe.effects.can_act());
        assert!(!arena.log.contains("afflicted"));
    }

    #[test]
    fn test_status_respects_stack_cap() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        let hex = skill(
            "hex",
            vec![("status", json!({"status": "burn", "stacks": 3, "on_hit": false}))],
        );
        arena.cast(HERO, &hex);
        arena.cast(HERO, &hex);
        assert_eq!(
            arena.roster.get(FOE).unwrap().effects.stacks(StatusKind::Burn),
            5
        );
    }

    #[test]
    fn test_zero_chance_never_applies() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        let dud = skill(
            "dud",
            vec![("status", json!({"status": "stun", "chance": 0.0, "on_hit": false}))],
        );
        arena.cast(HERO, &dud);
        assert!(!arena.roster.get(FOE).unwrap().effects.has_status(StatusKind::Stun));
    }

    #[test]
    fn test_combo_builder_stacks_on_owner() {
        let mut arena = Arena::duel(steady(100, 10.0), steady(1000, 10.0));
        let jab = skill(
            "jab",
            vec![("attack", json!({"hit_count": 3})), ("combo_builder", json!({}))],
        );
        arena.cast(HERO, &jab);
        assert_eq!(
            arena.roster.get(HERO).unwrap().effects.stacks(StatusKind::Combo),
            3
        );
    }
}
