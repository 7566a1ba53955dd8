//! Runtime error taxonomy

use crate::config::ConfigError;
use crate::types::EntityHandle;
use thiserror::Error;

/// An operation named a combatant that cannot take part in it
///
/// Always recoverable: the turn turns it into a log line and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("{0} is already defeated")]
    DeadTarget(EntityHandle),
    #[error("no combatant with handle {0}")]
    UnknownHandle(EntityHandle),
    #[error("no valid target")]
    NoTarget,
    #[error("the encounter has already finished")]
    EncounterFinished,
}

#[derive(Error, Debug)]
pub enum CombatError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("action budget of {limit} exceeded")]
    BudgetExceeded { limit: u32 },
}
