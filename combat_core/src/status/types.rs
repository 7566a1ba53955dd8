//! Status type definitions

use crate::stats::StatKind;
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Every status effect a combatant can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Burn,
    Poison,
    Bleed,
    Erode,
    Slow,
    Freeze,
    Stun,
    Paralyze,
    Curse,
    Mark,
    Submerge,
    Shock,
    Infection,
    Combo,
}

/// Broad grouping used by cleanse, conditions and the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    DamageOverTime,
    CrowdControl,
    Debuff,
}

impl StatusKind {
    pub fn all() -> &'static [StatusKind] {
        &[
            StatusKind::Burn,
            StatusKind::Poison,
            StatusKind::Bleed,
            StatusKind::Erode,
            StatusKind::Slow,
            StatusKind::Freeze,
            StatusKind::Stun,
            StatusKind::Paralyze,
            StatusKind::Curse,
            StatusKind::Mark,
            StatusKind::Submerge,
            StatusKind::Shock,
            StatusKind::Infection,
            StatusKind::Combo,
        ]
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            StatusKind::Burn | StatusKind::Poison | StatusKind::Bleed | StatusKind::Erode => {
                StatusCategory::DamageOverTime
            }
            StatusKind::Slow | StatusKind::Freeze | StatusKind::Stun | StatusKind::Paralyze => {
                StatusCategory::CrowdControl
            }
            _ => StatusCategory::Debuff,
        }
    }

    /// Whether this effect prevents its carrier from acting
    pub fn blocks_action(&self) -> bool {
        matches!(
            self,
            StatusKind::Freeze | StatusKind::Stun | StatusKind::Paralyze
        )
    }

    pub fn is_dot(&self) -> bool {
        self.category() == StatusCategory::DamageOverTime
    }

    /// Combo is a resource the owner builds, not an affliction
    pub fn is_harmful(&self) -> bool {
        *self != StatusKind::Combo
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StatusKind::Burn => "Burn",
            StatusKind::Poison => "Poison",
            StatusKind::Bleed => "Bleed",
            StatusKind::Erode => "Erode",
            StatusKind::Slow => "Slow",
            StatusKind::Freeze => "Freeze",
            StatusKind::Stun => "Stun",
            StatusKind::Paralyze => "Paralyze",
            StatusKind::Curse => "Curse",
            StatusKind::Mark => "Mark",
            StatusKind::Submerge => "Submerge",
            StatusKind::Shock => "Shock",
            StatusKind::Infection => "Infection",
            StatusKind::Combo => "Combo",
        }
    }
}

/// How a per-stack modifier lands in the accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMode {
    Flat,
    #[default]
    Percent,
}

/// A stat modifier carried by a status, scaled by its stacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusModifier {
    pub stat: StatKind,
    pub per_stack: f64,
    #[serde(default)]
    pub mode: ModifierMode,
}

/// Configuration for a status type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    pub kind: StatusKind,
    /// Display name; defaults to the kind's name
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Fraction of max HP dealt per stack on each round tick
    #[serde(default)]
    pub percent_per_stack: f64,
    /// Duration in rounds when a skill does not specify one
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    /// Element of the tick damage
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub modifiers: Vec<StatusModifier>,
}

fn default_max_stacks() -> u32 {
    1
}

fn default_duration() -> u32 {
    2
}

impl StatusConfig {
    /// Single stack, no damage, no modifiers
    pub fn bare(kind: StatusKind) -> Self {
        StatusConfig {
            kind,
            name: kind.display_name().to_string(),
            max_stacks: default_max_stacks(),
            percent_per_stack: 0.0,
            default_duration: default_duration(),
            element: Element::Neutral,
            modifiers: Vec::new(),
        }
    }

    pub fn with_stacks(mut self, max_stacks: u32, default_duration: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self.default_duration = default_duration;
        self
    }

    pub fn with_dot(mut self, percent_per_stack: f64) -> Self {
        self.percent_per_stack = percent_per_stack;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_modifier(mut self, stat: StatKind, per_stack: f64, mode: ModifierMode) -> Self {
        self.modifiers.push(StatusModifier {
            stat,
            per_stack,
            mode,
        });
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.display_name()
        } else {
            &self.name
        }
    }
}
