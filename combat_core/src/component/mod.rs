//! Skill components - composable effect units and their lifecycle hooks
//!
//! Skills, passives and equipment are all built from the same components.
//! Every hook has a no-op default; a component overrides only the hooks it
//! reacts to. Hooks return an optional combat-log line.

mod aura;
mod condition;
mod config;
mod elemental;
mod offense;
mod passive;
mod registry;
mod status;
mod support;

pub use condition::Condition;
pub use config::{ComponentConfig, Configure};
pub use offense::Attack;
pub use registry::{BoundComponent, ComponentRegistry};

use crate::context::ActionScope;
use crate::event::{DamageCalculationEvent, DamageDealtEvent, HitCalculationEvent, TakeDamageEvent};
use crate::skill::Skill;
use crate::stats::StatAccumulator;
use std::fmt;

/// How an aura's carrier relates to the combatant being snapshotted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraRelation {
    Ally,
    Enemy,
}

/// A single effect unit inside a skill
///
/// `scope.owner` is always the combatant whose skill holds this component.
pub trait SkillComponent: Configure + fmt::Debug + Send + Sync {
    /// Static modifiers this component adds to its owner's snapshot
    fn apply_stat(&self, _stats: &mut StatAccumulator) {}

    /// Modifiers this component adds to other combatants' snapshots
    fn apply_aura(&self, _stats: &mut StatAccumulator, _relation: AuraRelation) {}

    /// The skill is being cast
    fn on_turn(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    fn on_turn_start(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    fn on_turn_end(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    fn on_combat_start(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    fn on_combat_end(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    /// Outgoing damage before resolution (owner is the attacker)
    fn on_damage_calculation(
        &self,
        _event: &mut DamageCalculationEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        None
    }

    /// Outgoing damage after the pipeline (owner is the attacker)
    fn on_deal_damage(
        &self,
        _event: &mut DamageDealtEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        None
    }

    /// Incoming damage before mitigation (owner is the target)
    fn on_take_damage(
        &self,
        _event: &mut TakeDamageEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        None
    }

    /// Runs for both the attacker's and the target's components
    fn on_hit_calculation(
        &self,
        _event: &mut HitCalculationEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        None
    }

    /// The owner is about to cast an active skill
    fn on_skill_used(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    /// The owner's HP reached zero
    fn on_death(&self, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    /// The owner landed a hit
    fn on_attack(&self, _event: &DamageDealtEvent, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }

    /// The owner was hit and survived
    fn on_damaged(
        &self,
        _event: &DamageDealtEvent,
        _scope: &mut ActionScope<'_>,
    ) -> Option<String> {
        None
    }

    /// The owner drew a skill from the deck
    fn on_draw_skill(&self, _skill: &Skill, _scope: &mut ActionScope<'_>) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! A two-sided arena for exercising components without a full encounter

    use super::{BoundComponent, ComponentConfig, ComponentRegistry};
    use crate::combatant::{Combatant, Roster};
    use crate::context::{ActionScope, CombatRules, ComponentStateStore};
    use crate::log::CombatLog;
    use crate::skill::Skill;
    use crate::stats::StatBlock;
    use crate::types::{Element, EntityHandle, Side};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::sync::Arc;

    pub const HERO: EntityHandle = EntityHandle(0);
    pub const FOE: EntityHandle = EntityHandle(1);

    pub fn component(tag: &str, config: Value) -> BoundComponent {
        let fields = match config {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        ComponentRegistry::with_builtins()
            .create(tag, &ComponentConfig::new(fields), "Test", 0)
            .unwrap()
    }

    pub fn skill(id: &str, components: Vec<(&str, Value)>) -> Arc<Skill> {
        let bound = components
            .into_iter()
            .map(|(tag, config)| component(tag, config))
            .collect();
        Arc::new(Skill::new(id, id, Element::Neutral, "", bound))
    }

    /// Stats that never miss, never crit and take full damage
    pub fn steady(hp: i64, attack: f64) -> StatBlock {
        StatBlock {
            hp,
            max_hp: hp,
            attack,
            crit_rate: 0.0,
            evasion: 0.0,
            accuracy: 1000.0,
            ..StatBlock::default()
        }
    }

    pub struct Arena {
        pub roster: Roster,
        pub rules: CombatRules,
        pub states: ComponentStateStore,
        pub log: CombatLog,
        pub rng: StdRng,
    }

    impl Arena {
        pub fn duel(hero: StatBlock, foe: StatBlock) -> Self {
            let mut roster = Roster::new();
            roster.add(Combatant::player("Hero", hero));
            roster.add(Combatant::new("Foe", Side::Monster, foe));
            Arena {
                roster,
                rules: CombatRules::default(),
                states: ComponentStateStore::new(),
                log: CombatLog::new(),
                rng: StdRng::seed_from_u64(42),
            }
        }

        pub fn equip(&mut self, handle: EntityHandle, skill: Arc<Skill>) {
            self.roster.get_mut(handle).unwrap().equipment.push(skill);
        }

        pub fn hp(&self, handle: EntityHandle) -> i64 {
            self.roster.get(handle).unwrap().hp()
        }

        /// Scope for `owner` acting against the other duelist
        pub fn scope(&mut self, owner: EntityHandle) -> ActionScope<'_> {
            let target = if owner == HERO { FOE } else { HERO };
            let mut scope = ActionScope::new(
                &mut self.roster,
                &self.rules,
                &mut self.states,
                &mut self.log,
                &mut self.rng,
                owner,
            );
            scope.target = Some(target);
            scope
        }

        /// Cast a skill the way a turn does
        pub fn cast(&mut self, owner: EntityHandle, skill: &Arc<Skill>) {
            let mut scope = self.scope(owner);
            scope.action = Some((owner, Arc::clone(skill)));
            scope.dispatch_skill(owner, skill, |c, s| c.on_turn(s));
        }
    }
}
