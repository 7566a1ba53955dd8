//! Synergy service - keyword density and combo bonuses across a deck
//!
//! Read-only over skill definitions. Bonuses are recomputed whenever a
//! calculation asks for them; nothing is cached on the combatant.

use crate::skill::Skill;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Derived counter: equipped skills with an `attack` component
pub const ATTACK_COUNT: &str = "__attack_count__";
/// Derived counter: equipped skills with a `heal` or `buff` component
pub const HEAL_BUFF_COUNT: &str = "__heal_buff_count__";

/// Multiplicative modifiers granted by synergies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyBonus {
    pub damage: f64,
    pub heal: f64,
    pub shield: f64,
    pub crit_rate: f64,
    pub speed: f64,
}

impl Default for SynergyBonus {
    fn default() -> Self {
        SynergyBonus {
            damage: 1.0,
            heal: 1.0,
            shield: 1.0,
            crit_rate: 1.0,
            speed: 1.0,
        }
    }
}

impl SynergyBonus {
    /// Multiply two bonuses together
    pub fn combine(&self, other: &SynergyBonus) -> SynergyBonus {
        SynergyBonus {
            damage: self.damage * other.damage,
            heal: self.heal * other.heal,
            shield: self.shield * other.shield,
            crit_rate: self.crit_rate * other.crit_rate,
            speed: self.speed * other.speed,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == SynergyBonus::default()
    }
}

/// One threshold of a keyword group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyTier {
    pub name: String,
    pub threshold: u32,
    #[serde(default)]
    pub bonus: SynergyBonus,
}

/// Tiers unlocked by equipping several skills sharing a keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyGroup {
    pub keyword: String,
    pub tiers: Vec<SynergyTier>,
}

/// Bonus that requires every condition to hold at once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboSynergy {
    pub name: String,
    /// Counter name (keyword or derived counter) to minimum count
    pub conditions: BTreeMap<String, u32>,
    #[serde(default)]
    pub bonus: SynergyBonus,
}

/// A synergy that currently applies
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSynergy {
    pub name: String,
    /// Group keyword, or the combo's name
    pub source: String,
    pub threshold: u32,
    pub bonus: SynergyBonus,
}

/// Every synergy definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyTable {
    #[serde(default)]
    pub groups: Vec<SynergyGroup>,
    #[serde(default)]
    pub combos: Vec<ComboSynergy>,
}

/// Count keywords over the non-empty slots of a deck
///
/// Also fills the derived counters `__attack_count__` and
/// `__heal_buff_count__`.
pub fn count_keywords(deck: &[Option<Arc<Skill>>]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for skill in deck.iter().flatten() {
        for keyword in skill.keyword_list() {
            *counts.entry(keyword.to_string()).or_insert(0) += 1;
        }
        if skill.has_tag("attack") {
            *counts.entry(ATTACK_COUNT.to_string()).or_insert(0) += 1;
        }
        if skill.has_tag("heal") || skill.has_tag("buff") {
            *counts.entry(HEAL_BUFF_COUNT.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

impl SynergyTable {
    /// Sort every group's tiers from highest threshold down
    pub fn normalize(&mut self) {
        for group in &mut self.groups {
            group.tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.combos.is_empty()
    }

    /// Active synergies for a keyword count
    ///
    /// At most one tier per group: the highest threshold the count meets.
    pub fn active_for_counts(&self, counts: &HashMap<String, u32>) -> Vec<ActiveSynergy> {
        let mut active = Vec::new();

        for group in &self.groups {
            let count = counts.get(&group.keyword).copied().unwrap_or(0);
            let best = group
                .tiers
                .iter()
                .filter(|tier| count >= tier.threshold)
                .max_by_key(|tier| tier.threshold);
            if let Some(tier) = best {
                active.push(ActiveSynergy {
                    name: tier.name.clone(),
                    source: group.keyword.clone(),
                    threshold: tier.threshold,
                    bonus: tier.bonus,
                });
            }
        }

        for combo in &self.combos {
            let satisfied = combo
                .conditions
                .iter()
                .all(|(key, needed)| counts.get(key).copied().unwrap_or(0) >= *needed);
            if satisfied && !combo.conditions.is_empty() {
                active.push(ActiveSynergy {
                    name: combo.name.clone(),
                    source: combo.name.clone(),
                    threshold: 0,
                    bonus: combo.bonus,
                });
            }
        }

        active
    }

    pub fn get_active_synergies(&self, deck: &[Option<Arc<Skill>>]) -> Vec<ActiveSynergy> {
        self.active_for_counts(&count_keywords(deck))
    }

    /// Product of every active bonus
    pub fn bonus(&self, deck: &[Option<Arc<Skill>>]) -> SynergyBonus {
        self.get_active_synergies(deck)
            .iter()
            .fold(SynergyBonus::default(), |acc, s| acc.combine(&s.bonus))
    }
}
