//! StatusEffect - a stacked affliction on one combatant

use super::types::{ModifierMode, StatusConfig, StatusKind};
use crate::stats::{StatAccumulator, StatSource};
use crate::types::{Element, EntityHandle};

/// An active status effect instance
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub stacks: u32,
    /// Rounds remaining
    pub duration: u32,
    /// Who applied it, if anyone
    pub source: Option<EntityHandle>,
    config: StatusConfig,
}

impl StatusEffect {
    /// Create a new effect; stacks are capped at the type's maximum
    pub fn new(
        config: StatusConfig,
        stacks: u32,
        duration: u32,
        source: Option<EntityHandle>,
    ) -> Self {
        StatusEffect {
            stacks: stacks.min(config.max_stacks),
            duration,
            source,
            config,
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.config.kind
    }

    pub fn name(&self) -> &str {
        self.config.display_name()
    }

    pub fn max_stacks(&self) -> u32 {
        self.config.max_stacks
    }

    pub fn element(&self) -> Element {
        self.config.element
    }

    /// Re-application: add stacks up to the cap, keep the longer duration
    pub fn reapply(&mut self, stacks: u32, duration: u32, source: Option<EntityHandle>) {
        self.stacks = self.stacks.saturating_add(stacks).min(self.config.max_stacks);
        self.duration = self.duration.max(duration);
        if source.is_some() {
            self.source = source;
        }
    }

    /// False for freeze, stun and paralyze
    pub fn can_act(&self) -> bool {
        !self.kind().blocks_action()
    }

    /// Tick damage: `floor(max_hp * percent_per_stack * stacks)`, at least 1
    ///
    /// `None` for effects that do not deal damage.
    pub fn tick_damage(&self, max_hp: i64) -> Option<i64> {
        if !self.kind().is_dot() || self.config.percent_per_stack <= 0.0 || self.stacks == 0 {
            return None;
        }
        let raw = (max_hp.max(0) as f64 * self.config.percent_per_stack * self.stacks as f64)
            .floor() as i64;
        Some(raw.max(1))
    }

    /// Decrement the duration by one round
    /// Returns true if the effect is still active
    pub fn decay(&mut self) -> bool {
        self.duration = self.duration.saturating_sub(1);
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0 && self.stacks > 0
    }
}

impl StatSource for StatusEffect {
    fn apply(&self, stats: &mut StatAccumulator) {
        let stacks = self.stacks as f64;
        for modifier in &self.config.modifiers {
            let value = modifier.per_stack * stacks;
            match modifier.mode {
                ModifierMode::Flat => stats.add_flat(modifier.stat, value),
                ModifierMode::Percent => stats.add_increased(modifier.stat, value),
            }
        }
    }
}
