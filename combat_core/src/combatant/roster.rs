//! Roster - arena of every combatant in one encounter

use super::Combatant;
use crate::component::AuraRelation;
use crate::error::StateError;
use crate::stats::{StatAccumulator, StatSnapshot, StatSource};
use crate::types::{EntityHandle, Side};

/// Combatants indexed by their handle
#[derive(Debug, Clone, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant and assign it the next handle
    pub fn add(&mut self, mut combatant: Combatant) -> EntityHandle {
        let handle = EntityHandle(self.combatants.len() as u8);
        combatant.handle = handle;
        self.combatants.push(combatant);
        handle
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Combatant> {
        self.combatants.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Combatant> {
        self.combatants.get_mut(handle.index())
    }

    pub fn require(&self, handle: EntityHandle) -> Result<&Combatant, StateError> {
        self.get(handle).ok_or(StateError::UnknownHandle(handle))
    }

    pub fn require_mut(&mut self, handle: EntityHandle) -> Result<&mut Combatant, StateError> {
        self.get_mut(handle).ok_or(StateError::UnknownHandle(handle))
    }

    /// Like `require`, but a dead combatant is an error too
    pub fn require_living(&self, handle: EntityHandle) -> Result<&Combatant, StateError> {
        let combatant = self.require(handle)?;
        if combatant.is_alive() {
            Ok(combatant)
        } else {
            Err(StateError::DeadTarget(handle))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn handles(&self) -> Vec<EntityHandle> {
        self.combatants.iter().map(|c| c.handle).collect()
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn living_on(&self, side: Side) -> Vec<EntityHandle> {
        self.living()
            .filter(|c| c.side == side)
            .map(|c| c.handle)
            .collect()
    }

    /// Living combatants on the other side
    pub fn enemies_of(&self, handle: EntityHandle) -> Vec<EntityHandle> {
        match self.get(handle) {
            Some(c) => self.living_on(c.side.opposing()),
            None => Vec::new(),
        }
    }

    /// Living combatants on the same side, including `handle` itself
    pub fn allies_of(&self, handle: EntityHandle) -> Vec<EntityHandle> {
        match self.get(handle) {
            Some(c) => self.living_on(c.side),
            None => Vec::new(),
        }
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.living_on(side).is_empty()
    }

    /// Fresh stats for one calculation
    ///
    /// Base block, then the combatant's passives, then auras from every
    /// other living combatant, then buffs and status effects.
    pub fn snapshot(&self, handle: EntityHandle) -> Option<StatSnapshot> {
        let combatant = self.get(handle)?;
        let mut stats = StatAccumulator::from_block(&combatant.stats);

        for skill in combatant.passive_skills() {
            for bound in skill.components() {
                bound.component.apply_stat(&mut stats);
            }
        }

        for other in self.living().filter(|o| o.handle != handle) {
            let relation = if other.side == combatant.side {
                AuraRelation::Ally
            } else {
                AuraRelation::Enemy
            };
            for skill in other.passive_skills() {
                for bound in skill.components() {
                    bound.component.apply_aura(&mut stats, relation);
                }
            }
        }

        combatant.effects.apply(&mut stats);
        Some(stats.finish())
    }
}
