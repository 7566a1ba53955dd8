//! Stats - persisted stat blocks and per-calculation snapshots

mod accumulator;
mod stat_value;

pub use accumulator::{StatAccumulator, StatSnapshot};
pub use stat_value::StatValue;

use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Every stat that buffs, statuses and passives can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MaxHp,
    Attack,
    Defense,
    ApAttack,
    ApDefense,
    Speed,
    CritRate,
    CritDamage,
    Evasion,
    Accuracy,
    Lifesteal,
    DropRate,
    /// Multiplier on damage this combatant receives (1.0 = normal)
    DamageTaken,
    /// Multiplier on healing this combatant receives (1.0 = normal)
    HealReceived,
    /// Multiplier on damage this combatant deals (1.0 = normal)
    DamageDealt,
    /// Fraction of damage taken sent back to the attacker
    Reflect,
}

impl StatKind {
    pub const COUNT: usize = 16;

    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::MaxHp,
            StatKind::Attack,
            StatKind::Defense,
            StatKind::ApAttack,
            StatKind::ApDefense,
            StatKind::Speed,
            StatKind::CritRate,
            StatKind::CritDamage,
            StatKind::Evasion,
            StatKind::Accuracy,
            StatKind::Lifesteal,
            StatKind::DropRate,
            StatKind::DamageTaken,
            StatKind::HealReceived,
            StatKind::DamageDealt,
            StatKind::Reflect,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::MaxHp => "max hp",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::ApAttack => "magic attack",
            StatKind::ApDefense => "magic defense",
            StatKind::Speed => "speed",
            StatKind::CritRate => "crit rate",
            StatKind::CritDamage => "crit damage",
            StatKind::Evasion => "evasion",
            StatKind::Accuracy => "accuracy",
            StatKind::Lifesteal => "lifesteal",
            StatKind::DropRate => "drop rate",
            StatKind::DamageTaken => "damage taken",
            StatKind::HealReceived => "healing received",
            StatKind::DamageDealt => "damage dealt",
            StatKind::Reflect => "reflect",
        }
    }
}

/// One number per element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementTable {
    pub neutral: f64,
    pub fire: f64,
    pub water: f64,
    pub ice: f64,
    pub lightning: f64,
    pub earth: f64,
    pub wind: f64,
    pub light: f64,
    pub dark: f64,
}

impl ElementTable {
    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Neutral => self.neutral,
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Ice => self.ice,
            Element::Lightning => self.lightning,
            Element::Earth => self.earth,
            Element::Wind => self.wind,
            Element::Light => self.light,
            Element::Dark => self.dark,
        }
    }

    pub fn get_mut(&mut self, element: Element) -> &mut f64 {
        match element {
            Element::Neutral => &mut self.neutral,
            Element::Fire => &mut self.fire,
            Element::Water => &mut self.water,
            Element::Ice => &mut self.ice,
            Element::Lightning => &mut self.lightning,
            Element::Earth => &mut self.earth,
            Element::Wind => &mut self.wind,
            Element::Light => &mut self.light,
            Element::Dark => &mut self.dark,
        }
    }

    pub fn add(&mut self, element: Element, value: f64) {
        *self.get_mut(element) += value;
    }

    /// Element-wise sum
    pub fn merge(&mut self, other: &ElementTable) {
        for element in Element::all() {
            self.add(*element, other.get(*element));
        }
    }
}

/// A combatant's persisted stat block
///
/// Created from save data at battle start. Only `hp` changes during a battle;
/// everything else is modified through snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub hp: i64,
    pub max_hp: i64,
    pub attack: f64,
    pub defense: f64,
    pub ap_attack: f64,
    pub ap_defense: f64,
    pub speed: f64,
    /// Chance to crit as a fraction (0.05 = 5%)
    pub crit_rate: f64,
    /// Added to the critical multiplier
    pub crit_damage: f64,
    /// Subtracted from the attacker's accuracy when rolling to hit
    pub evasion: f64,
    pub accuracy: f64,
    pub lifesteal: f64,
    pub drop_rate: f64,
    /// Elemental resistance as a fraction per element
    pub resist: ElementTable,
    /// Elemental damage bonus as a fraction per element
    pub elemental_damage: ElementTable,
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock {
            hp: 100,
            max_hp: 100,
            attack: 10.0,
            defense: 0.0,
            ap_attack: 0.0,
            ap_defense: 0.0,
            speed: 10.0,
            crit_rate: 0.05,
            crit_damage: 0.0,
            evasion: 0.0,
            accuracy: 100.0,
            lifesteal: 0.0,
            drop_rate: 0.0,
            resist: ElementTable::default(),
            elemental_damage: ElementTable::default(),
        }
    }
}

impl StatBlock {
    /// Persisted value for a stat; multiplier stats start at 1.0
    pub fn base(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::MaxHp => self.max_hp as f64,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::ApAttack => self.ap_attack,
            StatKind::ApDefense => self.ap_defense,
            StatKind::Speed => self.speed,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
            StatKind::Evasion => self.evasion,
            StatKind::Accuracy => self.accuracy,
            StatKind::Lifesteal => self.lifesteal,
            StatKind::DropRate => self.drop_rate,
            StatKind::DamageTaken | StatKind::HealReceived | StatKind::DamageDealt => 1.0,
            StatKind::Reflect => 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }
}

/// Anything that contributes modifiers to a stat snapshot
///
/// The snapshot is rebuilt from every source before each calculation.
pub trait StatSource {
    /// Apply this source's modifiers to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
