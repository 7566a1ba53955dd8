//! combat_core - Turn-based combat resolution engine
//!
//! This library provides:
//! - Numeric combat math: damage, critical hits, hit chance
//! - Stat snapshots built from base stats, passives, auras, buffs and statuses
//! - Status effects and buffs with stacking, decay and damage over time
//! - Skill components: composable effects driven by lifecycle hooks
//! - The damage pipeline: invulnerability, resistance, shields, reflection
//! - Synergies: deck-wide bonuses from shared keywords
//! - Encounters: gauge scheduling, turns, rounds and outcomes

pub mod combatant;
pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod log;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod skill;
pub mod stats;
pub mod status;
pub mod synergy;
pub mod types;

// Re-export core types for convenience
pub use combatant::{Combatant, Roster};
pub use component::{ComponentRegistry, SkillComponent};
pub use config::{default_monsters, default_skill_book, CombatConstants, ConfigError};
pub use context::{CombatContext, CombatRules};
pub use error::{CombatError, StateError};
pub use log::{CombatLog, EncounterOutcome, EncounterReport};
pub use skill::{Skill, SkillBook};
pub use stats::{StatBlock, StatSnapshot};
pub use status::{StatusCatalog, StatusKind};
pub use synergy::{SynergyBonus, SynergyTable};
pub use types::{Element, EntityHandle, Side, TargetingMode};
