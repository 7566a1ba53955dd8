//! Combat context - one encounter's scheduler, hook scope and state
//!
//! `CombatContext` owns every combatant's runtime state for the life of an
//! encounter. Components reach that state only through `ActionScope`.

mod encounter;
mod gauge;
mod resolve;
mod scope;
mod state;

pub use encounter::{select_target, CombatContext};
pub use gauge::ActionGauge;
pub use resolve::{AttackOutcome, AttackSpec};
pub use scope::ActionScope;
pub use state::{ComponentKey, ComponentState, ComponentStateStore};

use crate::config::{self, CombatConstants, ConfigError};
use crate::status::StatusCatalog;
use crate::synergy::SynergyTable;

/// Read-only definitions shared by every encounter
#[derive(Debug, Clone)]
pub struct CombatRules {
    pub constants: CombatConstants,
    pub catalog: StatusCatalog,
    pub synergies: SynergyTable,
}

impl Default for CombatRules {
    fn default() -> Self {
        CombatRules {
            constants: CombatConstants::default(),
            catalog: StatusCatalog::with_defaults(),
            synergies: SynergyTable::default(),
        }
    }
}

impl CombatRules {
    pub fn new(constants: CombatConstants, catalog: StatusCatalog, synergies: SynergyTable) -> Self {
        CombatRules {
            constants,
            catalog,
            synergies,
        }
    }

    /// Default constants and statuses plus the bundled synergy table
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(CombatRules {
            synergies: config::default_synergies()?,
            ..CombatRules::default()
        })
    }
}
