//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{Element, EntityHandle, Side, TargetingMode};
pub use crate::stats::{StatBlock, StatKind, StatSnapshot};

// Combatants and skills
pub use crate::combatant::{Combatant, Roster};
pub use crate::skill::{Skill, SkillBook};
pub use crate::component::{ComponentRegistry, SkillComponent};

// Statuses
pub use crate::status::{Buff, BuffKind, StatusCatalog, StatusKind};

// Encounters
pub use crate::context::{CombatContext, CombatRules};
pub use crate::log::{CombatLog, EncounterOutcome, EncounterReport};

// Config
pub use crate::config::{
    default_monsters, default_skill_book, default_synergies, CombatConstants, ConfigError,
    MonsterDefinition,
};
