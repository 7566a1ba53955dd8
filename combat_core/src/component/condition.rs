//! Trigger conditions shared by conditional components

use crate::context::ActionScope;
use crate::status::StatusCategory;
use crate::types::EntityHandle;
use serde::{Deserialize, Serialize};

/// A predicate over the owner and a target, checked when a hook fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    TargetLowHp,
    OwnerLowHp,
    OwnerFullHp,
    TargetHasDebuff,
    TargetHasDot,
    TargetCc,
}

impl Condition {
    pub fn holds(&self, scope: &ActionScope<'_>, target: EntityHandle) -> bool {
        let effects = |handle: EntityHandle| scope.roster.get(handle).map(|c| &c.effects);
        match self {
            Condition::TargetLowHp => scope.is_low_hp(target),
            Condition::OwnerLowHp => scope.is_low_hp(scope.owner),
            Condition::OwnerFullHp => scope.hp_ratio(scope.owner) >= 1.0,
            Condition::TargetHasDebuff => effects(target).map(|e| e.has_debuff()).unwrap_or(false),
            Condition::TargetHasDot => effects(target)
                .map(|e| e.has_category(StatusCategory::DamageOverTime))
                .unwrap_or(false),
            Condition::TargetCc => effects(target).map(|e| !e.can_act()).unwrap_or(false),
        }
    }
}

/// Whether an optional condition is met; no condition always holds
pub fn check(condition: Option<Condition>, scope: &ActionScope<'_>, target: EntityHandle) -> bool {
    condition.map(|c| c.holds(scope, target)).unwrap_or(true)
}
