//! StatAccumulator - collects modifiers and produces a snapshot

use super::{ElementTable, StatBlock, StatKind, StatValue};
use crate::types::Element;

/// Collects modifiers for every stat before a calculation
///
/// Seeded from a [`StatBlock`], then every passive, buff and status effect
/// applies its contribution. `finish` turns it into a read-only snapshot.
#[derive(Debug, Clone)]
pub struct StatAccumulator {
    values: Vec<StatValue>,
    pub resist: ElementTable,
    pub elemental_damage: ElementTable,
    pub immunities: Vec<Element>,
    pub invulnerable: bool,
}

impl StatAccumulator {
    pub fn from_block(block: &StatBlock) -> Self {
        let values = StatKind::all()
            .iter()
            .map(|kind| StatValue::with_base(block.base(*kind)))
            .collect();
        StatAccumulator {
            values,
            resist: block.resist,
            elemental_damage: block.elemental_damage,
            immunities: Vec::new(),
            invulnerable: false,
        }
    }

    pub fn stat(&self, kind: StatKind) -> &StatValue {
        &self.values[kind.index()]
    }

    pub fn stat_mut(&mut self, kind: StatKind) -> &mut StatValue {
        &mut self.values[kind.index()]
    }

    pub fn add_flat(&mut self, kind: StatKind, value: f64) {
        self.stat_mut(kind).add_flat(value);
    }

    pub fn add_increased(&mut self, kind: StatKind, value: f64) {
        self.stat_mut(kind).add_increased(value);
    }

    pub fn add_more(&mut self, kind: StatKind, value: f64) {
        self.stat_mut(kind).add_more(value);
    }

    pub fn add_resist(&mut self, element: Element, value: f64) {
        self.resist.add(element, value);
    }

    pub fn add_elemental_damage(&mut self, element: Element, value: f64) {
        self.elemental_damage.add(element, value);
    }

    pub fn add_immunity(&mut self, element: Element) {
        if !self.immunities.contains(&element) {
            self.immunities.push(element);
        }
    }

    /// Compute every stat; negative results clamp to zero
    pub fn finish(self) -> StatSnapshot {
        let mut values = [0.0; StatKind::COUNT];
        for (slot, value) in values.iter_mut().zip(self.values.iter()) {
            *slot = value.compute().max(0.0);
        }
        StatSnapshot {
            values,
            resist: self.resist,
            elemental_damage: self.elemental_damage,
            immunities: self.immunities,
            invulnerable: self.invulnerable,
        }
    }
}

/// Read-only stats for one calculation
///
/// Rebuilt before every hit, heal and gauge fill. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSnapshot {
    values: [f64; StatKind::COUNT],
    pub resist: ElementTable,
    pub elemental_damage: ElementTable,
    pub immunities: Vec<Element>,
    pub invulnerable: bool,
}

impl StatSnapshot {
    pub fn get(&self, kind: StatKind) -> f64 {
        self.values[kind.index()]
    }

    pub fn max_hp(&self) -> i64 {
        (self.get(StatKind::MaxHp).floor() as i64).max(1)
    }

    pub fn attack(&self) -> f64 {
        self.get(StatKind::Attack)
    }

    pub fn defense(&self) -> f64 {
        self.get(StatKind::Defense)
    }

    pub fn ap_attack(&self) -> f64 {
        self.get(StatKind::ApAttack)
    }

    pub fn ap_defense(&self) -> f64 {
        self.get(StatKind::ApDefense)
    }

    pub fn speed(&self) -> f64 {
        self.get(StatKind::Speed)
    }

    pub fn crit_rate(&self) -> f64 {
        self.get(StatKind::CritRate)
    }

    pub fn crit_damage(&self) -> f64 {
        self.get(StatKind::CritDamage)
    }

    pub fn evasion(&self) -> f64 {
        self.get(StatKind::Evasion)
    }

    pub fn accuracy(&self) -> f64 {
        self.get(StatKind::Accuracy)
    }

    pub fn lifesteal(&self) -> f64 {
        self.get(StatKind::Lifesteal)
    }

    pub fn reflect(&self) -> f64 {
        self.get(StatKind::Reflect)
    }

    pub fn damage_taken(&self) -> f64 {
        self.get(StatKind::DamageTaken)
    }

    pub fn heal_received(&self) -> f64 {
        self.get(StatKind::HealReceived)
    }

    pub fn damage_dealt(&self) -> f64 {
        self.get(StatKind::DamageDealt)
    }

    pub fn is_immune(&self, element: Element) -> bool {
        self.immunities.contains(&element)
    }
}
