//! ActionScope - everything a component hook may read or change

use super::state::{ComponentKey, ComponentState, ComponentStateStore};
use super::CombatRules;
use crate::combatant::{Combatant, Roster};
use crate::component::SkillComponent;
use crate::config::CombatConstants;
use crate::error::StateError;
use crate::log::CombatLog;
use crate::pipeline::{self, DamageRequest, DamageResult};
use crate::skill::Skill;
use crate::stats::StatSnapshot;
use crate::status::{Buff, StatusKind};
use crate::synergy::SynergyBonus;
use crate::types::{Element, EntityHandle};
use rand::{Rng, RngCore};
use std::sync::Arc;
use tracing::warn;

/// Mutable view of one encounter while a hook chain runs
///
/// Components never call each other; they only go through this scope.
pub struct ActionScope<'a> {
    pub roster: &'a mut Roster,
    pub rules: &'a CombatRules,
    pub states: &'a mut ComponentStateStore,
    pub log: &'a mut CombatLog,
    pub rng: &'a mut dyn RngCore,
    /// Combatant whose component is running
    pub owner: EntityHandle,
    /// Chosen target of the current action
    pub target: Option<EntityHandle>,
    /// Active skill being cast this action, and its caster
    pub action: Option<(EntityHandle, Arc<Skill>)>,
    /// Skill whose component is running
    pub current: Option<Arc<Skill>>,
    /// Index of the running component inside `current`
    pub index: usize,
}

impl<'a> ActionScope<'a> {
    pub fn new(
        roster: &'a mut Roster,
        rules: &'a CombatRules,
        states: &'a mut ComponentStateStore,
        log: &'a mut CombatLog,
        rng: &'a mut dyn RngCore,
        owner: EntityHandle,
    ) -> Self {
        ActionScope {
            roster,
            rules,
            states,
            log,
            rng,
            owner,
            target: None,
            action: None,
            current: None,
            index: 0,
        }
    }

    pub fn constants(&self) -> &'a CombatConstants {
        &self.rules.constants
    }

    pub fn combatant(&self, handle: EntityHandle) -> Result<&Combatant, StateError> {
        self.roster.require(handle)
    }

    pub fn name_of(&self, handle: EntityHandle) -> String {
        self.roster
            .get(handle)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| handle.to_string())
    }

    pub fn owner_name(&self) -> String {
        self.name_of(self.owner)
    }

    pub fn is_alive(&self, handle: EntityHandle) -> bool {
        self.roster.get(handle).map(|c| c.is_alive()).unwrap_or(false)
    }

    pub fn snapshot(&self, handle: EntityHandle) -> Result<StatSnapshot, StateError> {
        self.roster
            .snapshot(handle)
            .ok_or(StateError::UnknownHandle(handle))
    }

    /// Current HP over effective max HP
    pub fn hp_ratio(&self, handle: EntityHandle) -> f64 {
        match (self.roster.get(handle), self.roster.snapshot(handle)) {
            (Some(c), Some(s)) => c.stats.hp as f64 / s.max_hp() as f64,
            _ => 0.0,
        }
    }

    pub fn is_low_hp(&self, handle: EntityHandle) -> bool {
        self.is_alive(handle)
            && self.hp_ratio(handle) <= self.rules.constants.encounter.low_hp_threshold
    }

    /// Living enemies of the owner
    pub fn enemies(&self) -> Vec<EntityHandle> {
        self.roster.enemies_of(self.owner)
    }

    /// Living allies of the owner, the owner included
    pub fn allies(&self) -> Vec<EntityHandle> {
        self.roster.allies_of(self.owner)
    }

    /// The action's target, if it is still alive
    pub fn target(&self) -> Result<EntityHandle, StateError> {
        let target = self.target.ok_or(StateError::NoTarget)?;
        self.roster.require_living(target)?;
        Ok(target)
    }

    /// Synergy bonus of a combatant's deck, computed now
    pub fn synergy_bonus(&self, handle: EntityHandle) -> SynergyBonus {
        match self.roster.get(handle) {
            Some(c) => self.rules.synergies.bonus(&c.deck),
            None => SynergyBonus::default(),
        }
    }

    pub fn skill_name(&self) -> String {
        self.current
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    pub fn skill_attribute(&self) -> Element {
        self.current
            .as_ref()
            .map(|s| s.attribute)
            .unwrap_or_default()
    }

    pub fn key(&self) -> ComponentKey {
        ComponentKey {
            skill: self
                .current
                .as_ref()
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            index: self.index,
        }
    }

    /// Counters of the running component for the current owner
    pub fn state(&mut self) -> &mut ComponentState {
        let key = self.key();
        self.states.entry(self.owner, key)
    }

    /// Roll a probability in [0, 1]
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            true
        } else if probability <= 0.0 {
            false
        } else {
            self.rng.gen::<f64>() < probability
        }
    }

    /// Restore HP, scaled by healing received and capped at max HP
    ///
    /// Returns the HP actually restored.
    pub fn heal(&mut self, target: EntityHandle, amount: f64) -> Result<i64, StateError> {
        self.roster.require_living(target)?;
        let snapshot = self.snapshot(target)?;
        let amount = (amount.max(0.0) * snapshot.heal_received()).floor() as i64;
        let combatant = self.roster.require_mut(target)?;
        let missing = (snapshot.max_hp() - combatant.stats.hp).max(0);
        let healed = amount.min(missing);
        combatant.stats.hp += healed;
        Ok(healed)
    }

    /// Apply a status with the owner as its source
    ///
    /// `None` duration uses the status type's default. Returns the
    /// resulting stack count.
    pub fn apply_status(
        &mut self,
        target: EntityHandle,
        kind: StatusKind,
        stacks: u32,
        duration: Option<u32>,
    ) -> Result<u32, StateError> {
        self.roster.require_living(target)?;
        let config = self.rules.catalog.config_or_default(kind);
        let duration = duration.unwrap_or(config.default_duration);
        let source = Some(self.owner);
        let combatant = self.roster.require_mut(target)?;
        Ok(combatant
            .effects
            .apply_status(&config, stacks, duration, source))
    }

    pub fn apply_buff(&mut self, target: EntityHandle, buff: Buff) -> Result<(), StateError> {
        self.roster.require_living(target)?;
        self.roster.require_mut(target)?.effects.apply_buff(buff);
        Ok(())
    }

    /// Fixed damage from the owner that skips the damage formula
    ///
    /// Marked as reflected so it can never bounce back or chain reactions.
    pub fn deal_fixed_damage(
        &mut self,
        target: EntityHandle,
        amount: i64,
        attribute: Element,
    ) -> Result<DamageResult, StateError> {
        let request = DamageRequest::new(target, amount, attribute)
            .from_attacker(self.owner)
            .reflected();
        let result = pipeline::process_incoming_damage(self.roster, &request, &self.rules.constants)?;
        self.log.extend(result.logs.iter().cloned());
        Ok(result)
    }

    /// Turn a recoverable error into a log line
    pub fn recover(&mut self, err: StateError) -> Option<String> {
        warn!(owner = %self.owner, skill = %self.skill_name(), error = %err, "recovered state error");
        let reason = match err {
            StateError::DeadTarget(handle) => format!("{} is already defeated", self.name_of(handle)),
            StateError::NoTarget => "no valid target".to_string(),
            other => other.to_string(),
        };
        Some(format!(
            "{}'s {} has no effect: {}.",
            self.owner_name(),
            self.skill_name(),
            reason
        ))
    }

    /// Run a hook on every passive of `handle`, appending their lines to the log
    pub fn dispatch_passives<F>(&mut self, handle: EntityHandle, mut hook: F)
    where
        F: FnMut(&dyn SkillComponent, &mut ActionScope<'_>) -> Option<String>,
    {
        let skills = match self.roster.get(handle) {
            Some(combatant) => combatant.passive_skills(),
            None => return,
        };
        let saved_owner = self.owner;
        self.owner = handle;
        for skill in &skills {
            let lines = skill.dispatch(self, &mut hook);
            self.log.extend(lines);
        }
        self.owner = saved_owner;
    }

    /// Run a hook on one skill owned by `handle`
    pub fn dispatch_skill<F>(&mut self, handle: EntityHandle, skill: &Arc<Skill>, mut hook: F)
    where
        F: FnMut(&dyn SkillComponent, &mut ActionScope<'_>) -> Option<String>,
    {
        let saved_owner = self.owner;
        self.owner = handle;
        let lines = skill.dispatch(self, &mut hook);
        self.log.extend(lines);
        self.owner = saved_owner;
    }

    /// Run a hook on the attacker's side: the skill being cast (when the
    /// attacker is its caster), then the attacker's passives
    pub fn dispatch_offense<F>(&mut self, attacker: EntityHandle, mut hook: F)
    where
        F: FnMut(&dyn SkillComponent, &mut ActionScope<'_>) -> Option<String>,
    {
        if let Some((caster, skill)) = self.action.clone() {
            if caster == attacker {
                self.dispatch_skill(attacker, &skill, &mut hook);
            }
        }
        self.dispatch_passives(attacker, hook);
    }
}
