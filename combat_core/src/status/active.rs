//! ActiveEffects - every buff and status currently on one combatant

use super::buff::{Buff, BuffKind};
use super::effect::StatusEffect;
use super::types::{StatusCategory, StatusConfig, StatusKind};
use crate::stats::{StatAccumulator, StatSource};
use crate::types::{Element, EntityHandle};

/// Damage owed by one damage-over-time effect on a round tick
#[derive(Debug, Clone, PartialEq)]
pub struct DotTick {
    pub kind: StatusKind,
    pub name: String,
    pub element: Element,
    pub damage: i64,
    pub source: Option<EntityHandle>,
}

/// Buffs and status effects, in application order
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    buffs: Vec<Buff>,
    statuses: Vec<StatusEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    pub fn statuses(&self) -> &[StatusEffect] {
        &self.statuses
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty() && self.statuses.is_empty()
    }

    /// Apply a status: existing effects gain stacks (capped) and keep the
    /// longer duration, new ones start at `min(stacks, max)`
    ///
    /// Returns the resulting stack count.
    pub fn apply_status(
        &mut self,
        config: &StatusConfig,
        stacks: u32,
        duration: u32,
        source: Option<EntityHandle>,
    ) -> u32 {
        // Zero stacks or zero rounds applies nothing
        if stacks == 0 || duration == 0 {
            return 0;
        }
        if let Some(existing) = self.statuses.iter_mut().find(|s| s.kind() == config.kind) {
            existing.reapply(stacks, duration, source);
            return existing.stacks;
        }
        let effect = StatusEffect::new(config.clone(), stacks, duration, source);
        let applied = effect.stacks;
        self.statuses.push(effect);
        applied
    }

    /// Apply a buff; the same kind from the same source refreshes instead of
    /// stacking, except shields whose pools add up
    pub fn apply_buff(&mut self, buff: Buff) {
        let existing = self.buffs.iter_mut().find(|b| {
            b.kind == buff.kind && b.source == buff.source && b.is_debuff == buff.is_debuff
        });
        match existing {
            Some(current) if buff.kind == BuffKind::Shield => {
                current.amount += buff.amount;
                current.duration = current.duration.max(buff.duration);
            }
            Some(current) => {
                current.amount = buff.amount;
                current.duration = current.duration.max(buff.duration);
            }
            None => self.buffs.push(buff),
        }
    }

    /// Run once per round: decrement every duration, remove what reached zero
    ///
    /// Returns one expiry line per removed effect.
    pub fn decay_all_durations(&mut self, owner: &str) -> Vec<String> {
        let mut expired = Vec::new();

        self.buffs.retain_mut(|buff| {
            if buff.decay() {
                true
            } else {
                expired.push(format!("{}'s {} wore off.", owner, buff.describe()));
                false
            }
        });

        self.statuses.retain_mut(|status| {
            if status.decay() {
                true
            } else {
                expired.push(format!("{}'s {} wore off.", owner, status.name()));
                false
            }
        });

        expired
    }

    /// Tick damage owed by every damage-over-time effect
    pub fn dot_ticks(&self, max_hp: i64) -> Vec<DotTick> {
        self.statuses
            .iter()
            .filter_map(|status| {
                status.tick_damage(max_hp).map(|damage| DotTick {
                    kind: status.kind(),
                    name: status.name().to_string(),
                    element: status.element(),
                    damage,
                    source: status.source,
                })
            })
            .collect()
    }

    /// False if any active effect blocks action
    pub fn can_act(&self) -> bool {
        self.statuses.iter().all(|s| s.can_act())
    }

    /// Name of the first effect that blocks action
    pub fn cc_effect_name(&self) -> Option<&str> {
        self.statuses.iter().find(|s| !s.can_act()).map(|s| s.name())
    }

    pub fn status(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.statuses.iter().find(|s| s.kind() == kind)
    }

    pub fn stacks(&self, kind: StatusKind) -> u32 {
        self.status(kind).map(|s| s.stacks).unwrap_or(0)
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status(kind).is_some()
    }

    pub fn has_category(&self, category: StatusCategory) -> bool {
        self.statuses.iter().any(|s| s.kind().category() == category)
    }

    /// Any harmful status or debuff
    pub fn has_debuff(&self) -> bool {
        self.statuses.iter().any(|s| s.kind().is_harmful()) || self.buffs.iter().any(|b| b.is_debuff)
    }

    pub fn remove_status(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.statuses.iter().position(|s| s.kind() == kind)?;
        Some(self.statuses.remove(index))
    }

    /// Remove a status and return how many stacks it had
    pub fn consume_stacks(&mut self, kind: StatusKind) -> u32 {
        self.remove_status(kind).map(|s| s.stacks).unwrap_or(0)
    }

    /// Remove up to `count` harmful effects, oldest first
    ///
    /// Returns the names of what was removed.
    pub fn cleanse(&mut self, count: usize) -> Vec<String> {
        let mut removed = Vec::new();
        self.statuses.retain(|status| {
            if removed.len() < count && status.kind().is_harmful() {
                removed.push(status.name().to_string());
                false
            } else {
                true
            }
        });
        self.buffs.retain(|buff| {
            if removed.len() < count && buff.is_debuff {
                removed.push(buff.describe());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove up to `count` beneficial buffs, oldest first
    pub fn dispel(&mut self, count: usize) -> Vec<String> {
        let mut removed = Vec::new();
        self.buffs.retain(|buff| {
            if removed.len() < count && !buff.is_debuff {
                removed.push(buff.describe());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn shield_total(&self) -> i64 {
        self.buffs
            .iter()
            .filter(|b| b.kind == BuffKind::Shield)
            .map(|b| b.amount.floor() as i64)
            .sum()
    }

    /// Drain shields, oldest first, and return how much was absorbed
    ///
    /// Depleted shields are removed; overflow is left for the caller.
    pub fn absorb(&mut self, damage: i64) -> i64 {
        let mut remaining = damage.max(0);
        let mut absorbed = 0;
        for buff in self.buffs.iter_mut().filter(|b| b.kind == BuffKind::Shield) {
            if remaining == 0 {
                break;
            }
            let pool = buff.amount.floor() as i64;
            let taken = pool.min(remaining).max(0);
            buff.amount -= taken as f64;
            remaining -= taken;
            absorbed += taken;
        }
        self.buffs
            .retain(|b| b.kind != BuffKind::Shield || b.amount >= 1.0);
        absorbed
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
        self.statuses.clear();
    }
}

impl StatSource for ActiveEffects {
    fn apply(&self, stats: &mut StatAccumulator) {
        for buff in &self.buffs {
            buff.apply(stats);
        }
        for status in &self.statuses {
            status.apply(stats);
        }
    }
}
