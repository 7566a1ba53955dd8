//! Aura components - modifiers projected onto other combatants

use super::{AuraRelation, SkillComponent};
use crate::context::ActionScope;
use crate::stats::{StatAccumulator, StatKind};
use crate::status::StatusKind;
use serde::Deserialize;

/// Percent increases shared by the aura buff and debuff
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct AuraAmounts {
    pub attack_percent: f64,
    pub defense_percent: f64,
    pub speed_percent: f64,
}

impl AuraAmounts {
    fn apply(&self, stats: &mut StatAccumulator, sign: f64) {
        for (kind, value) in [
            (StatKind::Attack, self.attack_percent),
            (StatKind::Defense, self.defense_percent),
            (StatKind::Speed, self.speed_percent),
        ] {
            if value != 0.0 {
                stats.add_increased(kind, sign * value.abs());
            }
        }
    }
}

/// Raise allies' stats while the owner is alive
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuraBuff {
    #[serde(flatten)]
    pub amounts: AuraAmounts,
    pub include_self: bool,
}

impl Default for AuraBuff {
    fn default() -> Self {
        AuraBuff {
            amounts: AuraAmounts::default(),
            include_self: true,
        }
    }
}

impl SkillComponent for AuraBuff {
    fn apply_stat(&self, stats: &mut StatAccumulator) {
        if self.include_self {
            self.amounts.apply(stats, 1.0);
        }
    }

    fn apply_aura(&self, stats: &mut StatAccumulator, relation: AuraRelation) {
        if relation == AuraRelation::Ally {
            self.amounts.apply(stats, 1.0);
        }
    }
}

/// Lower enemies' stats while the owner is alive
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuraDebuff {
    #[serde(flatten)]
    pub amounts: AuraAmounts,
}

impl SkillComponent for AuraDebuff {
    fn apply_aura(&self, stats: &mut StatAccumulator, relation: AuraRelation) {
        if relation == AuraRelation::Enemy {
            self.amounts.apply(stats, -1.0);
        }
    }
}

/// Afflict every enemy at the start of the owner's turn
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuraStatus {
    pub status: StatusKind,
    pub stacks: u32,
    pub duration: Option<u32>,
    pub chance: f64,
}

impl Default for AuraStatus {
    fn default() -> Self {
        AuraStatus {
            status: StatusKind::Slow,
            stacks: 1,
            duration: None,
            chance: 1.0,
        }
    }
}

impl SkillComponent for AuraStatus {
    fn on_turn_start(&self, scope: &mut ActionScope<'_>) -> Option<String> {
        let mut afflicted = Vec::new();
        for enemy in scope.enemies() {
            if !scope.chance(self.chance) {
                continue;
            }
            match scope.apply_status(enemy, self.status, self.stacks, self.duration) {
                Ok(0) => {}
                Ok(_) => afflicted.push(scope.name_of(enemy)),
                Err(err) => {
                    scope.recover(err);
                }
            }
        }
        if afflicted.is_empty() {
            return None;
        }
        let name = scope.rules.catalog.config_or_default(self.status).name;
        Some(format!(
            "{}'s aura afflicts {} with {}.",
            scope.owner_name(),
            afflicted.join(", "),
            name
        ))
    }
}
