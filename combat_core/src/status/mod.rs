//! Status/Buff engine - stacking afflictions, timed buffs and their decay

mod active;
mod buff;
mod effect;
mod types;

pub use active::{ActiveEffects, DotTick};
pub use buff::{Buff, BuffKind};
pub use effect::StatusEffect;
pub use types::{ModifierMode, StatusCategory, StatusConfig, StatusKind, StatusModifier};

use crate::stats::StatKind;
use crate::types::Element;
use std::collections::HashMap;

/// Status type registry
#[derive(Debug, Clone, Default)]
pub struct StatusCatalog {
    configs: HashMap<StatusKind, StatusConfig>,
}

impl StatusCatalog {
    pub fn new() -> Self {
        StatusCatalog {
            configs: HashMap::new(),
        }
    }

    /// Register a status type, replacing any previous entry for the same kind
    pub fn register(&mut self, config: StatusConfig) {
        self.configs.insert(config.kind, config);
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusConfig> {
        self.configs.get(&kind)
    }

    /// Configuration for a kind, falling back to a bare single-stack entry
    pub fn config_or_default(&self, kind: StatusKind) -> StatusConfig {
        self.get(kind)
            .cloned()
            .unwrap_or_else(|| StatusConfig::bare(kind))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Overlay another catalog's entries on top of this one
    pub fn merge(&mut self, other: StatusCatalog) {
        self.configs.extend(other.configs);
    }

    /// The built-in status types
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        // Damage over time
        catalog.register(
            StatusConfig::bare(StatusKind::Burn)
                .with_stacks(5, 3)
                .with_dot(0.03)
                .with_element(Element::Fire),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Poison)
                .with_stacks(10, 3)
                .with_dot(0.02),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Bleed)
                .with_stacks(5, 3)
                .with_dot(0.025),
        );
        // Erode also strips armour
        catalog.register(
            StatusConfig::bare(StatusKind::Erode)
                .with_stacks(5, 3)
                .with_dot(0.02)
                .with_element(Element::Earth)
                .with_modifier(StatKind::Defense, -0.08, ModifierMode::Percent),
        );

        // Crowd control
        catalog.register(
            StatusConfig::bare(StatusKind::Slow)
                .with_stacks(3, 2)
                .with_modifier(StatKind::Speed, -0.15, ModifierMode::Percent),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Freeze)
                .with_stacks(1, 1)
                .with_element(Element::Ice),
        );
        catalog.register(StatusConfig::bare(StatusKind::Stun).with_stacks(1, 1));
        catalog.register(
            StatusConfig::bare(StatusKind::Paralyze)
                .with_stacks(1, 1)
                .with_element(Element::Lightning),
        );

        // Other debuffs
        catalog.register(
            StatusConfig::bare(StatusKind::Curse)
                .with_stacks(5, 3)
                .with_element(Element::Dark)
                .with_modifier(StatKind::Attack, -0.05, ModifierMode::Percent),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Mark)
                .with_stacks(1, 2)
                .with_modifier(StatKind::DamageTaken, 0.15, ModifierMode::Flat),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Submerge)
                .with_stacks(3, 2)
                .with_element(Element::Water)
                .with_modifier(StatKind::Speed, -0.10, ModifierMode::Percent),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Shock)
                .with_stacks(5, 2)
                .with_element(Element::Lightning)
                .with_modifier(StatKind::ApDefense, -0.10, ModifierMode::Percent),
        );
        catalog.register(
            StatusConfig::bare(StatusKind::Infection)
                .with_stacks(5, 3)
                .with_modifier(StatKind::HealReceived, -0.20, ModifierMode::Flat),
        );
        // Combo is a counter spent by finishers
        catalog.register(StatusConfig::bare(StatusKind::Combo).with_stacks(10, 99));

        catalog
    }
}
