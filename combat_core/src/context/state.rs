//! Per-combatant component state

use crate::types::EntityHandle;
use std::collections::HashMap;

/// Identifies one component slot inside one skill
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub skill: String,
    pub index: usize,
}

/// Counters a stateful component keeps for one owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentState {
    pub uses: u32,
    pub turns: u32,
    pub stacks: u32,
    pub triggered: bool,
}

/// Component counters for one encounter
///
/// Lives in the combat context and is dropped with it, so nothing carries
/// over into the next battle.
#[derive(Debug, Clone, Default)]
pub struct ComponentStateStore {
    states: HashMap<(EntityHandle, ComponentKey), ComponentState>,
}

impl ComponentStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: EntityHandle, key: &ComponentKey) -> ComponentState {
        self.states
            .get(&(owner, key.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn entry(&mut self, owner: EntityHandle, key: ComponentKey) -> &mut ComponentState {
        self.states.entry((owner, key)).or_default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
