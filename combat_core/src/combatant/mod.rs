//! Combatants and the per-encounter roster

mod roster;

pub use roster::Roster;

use crate::config::{ConfigError, MonsterDefinition};
use crate::skill::{Skill, SkillBook};
use crate::stats::StatBlock;
use crate::status::ActiveEffects;
use crate::types::{Element, EntityHandle, Side};
use std::sync::Arc;

/// A participant in an encounter
///
/// Owned by the encounter for its lifetime. Skills are shared definitions;
/// everything else is runtime state.
#[derive(Debug, Clone)]
pub struct Combatant {
    /// Assigned when the combatant joins a roster
    pub handle: EntityHandle,
    pub name: String,
    pub side: Side,
    pub attribute: Element,
    pub stats: StatBlock,
    pub effects: ActiveEffects,
    /// Fixed-size deck; `None` is an empty slot
    pub deck: Vec<Option<Arc<Skill>>>,
    /// Equipment-derived passives
    pub equipment: Vec<Arc<Skill>>,
    pub(crate) draw_cursor: usize,
    /// Set once death has been processed and no revive fired
    pub(crate) defeated: bool,
}

impl Combatant {
    pub fn new(name: impl Into<String>, side: Side, stats: StatBlock) -> Self {
        Combatant {
            handle: EntityHandle(0),
            name: name.into(),
            side,
            attribute: Element::Neutral,
            stats,
            effects: ActiveEffects::new(),
            deck: Vec::new(),
            equipment: Vec::new(),
            draw_cursor: 0,
            defeated: false,
        }
    }

    pub fn player(name: impl Into<String>, stats: StatBlock) -> Self {
        Self::new(name, Side::Player, stats)
    }

    /// Build a monster from its definition
    pub fn monster(definition: &MonsterDefinition, book: &SkillBook) -> Result<Self, ConfigError> {
        let mut stats = definition.stats.clone();
        stats.hp = stats.max_hp;
        let mut monster =
            Self::new(&definition.name, Side::Monster, stats).with_attribute(definition.attribute);
        monster.deck = definition
            .skills
            .iter()
            .map(|id| book.require(id).map(Some))
            .collect::<Result<_, _>>()?;
        Ok(monster)
    }

    pub fn with_attribute(mut self, attribute: Element) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn with_deck(mut self, deck: Vec<Option<Arc<Skill>>>) -> Self {
        self.deck = deck;
        self
    }

    pub fn with_equipment(mut self, equipment: Vec<Arc<Skill>>) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn hp(&self) -> i64 {
        self.stats.hp
    }

    /// Passive skills from the deck followed by equipment
    pub fn passive_skills(&self) -> Vec<Arc<Skill>> {
        self.deck
            .iter()
            .flatten()
            .filter(|skill| skill.is_passive())
            .chain(self.equipment.iter())
            .cloned()
            .collect()
    }

    /// Skills that can be drawn and cast
    pub fn active_skills(&self) -> Vec<Arc<Skill>> {
        self.deck
            .iter()
            .flatten()
            .filter(|skill| !skill.is_passive())
            .cloned()
            .collect()
    }

    /// Next active skill in deck order, wrapping around
    ///
    /// Passive and empty slots are skipped; `None` if the deck has no
    /// active skill at all.
    pub fn draw_next(&mut self) -> Option<Arc<Skill>> {
        let len = self.deck.len();
        for offset in 0..len {
            let slot = (self.draw_cursor + offset) % len;
            if let Some(skill) = &self.deck[slot] {
                if !skill.is_passive() {
                    self.draw_cursor = (slot + 1) % len;
                    return Some(Arc::clone(skill));
                }
            }
        }
        None
    }

    /// Status lines for reports, e.g. "Burn x3 (2r)"
    pub fn status_summary(&self) -> Vec<String> {
        let statuses = self
            .effects
            .statuses()
            .iter()
            .map(|s| format!("{} x{} ({}r)", s.name(), s.stacks, s.duration));
        let buffs = self
            .effects
            .buffs()
            .iter()
            .map(|b| format!("{} ({}r)", b.describe(), b.duration));
        statuses.chain(buffs).collect()
    }
}
