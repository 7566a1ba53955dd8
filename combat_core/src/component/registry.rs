//! ComponentRegistry - tag to constructor map

use super::{
    aura, elemental, offense, passive, status, support, ComponentConfig, Configure, SkillComponent,
};
use crate::config::ConfigError;
use std::collections::HashMap;

type Factory = fn() -> Box<dyn SkillComponent>;

fn make<T: SkillComponent + Default + 'static>() -> Box<dyn SkillComponent> {
    Box::<T>::default()
}

/// Every built-in component, by tag
const BUILTIN: &[(&str, Factory)] = &[
    // Offense
    ("attack", make::<offense::Attack>),
    ("crit", make::<offense::Crit>),
    ("penetration", make::<offense::Penetration>),
    ("accuracy", make::<offense::Accuracy>),
    ("true_strike", make::<offense::TrueStrike>),
    ("execute", make::<offense::Execute>),
    ("combo_finisher", make::<offense::ComboFinisher>),
    ("status_amplify", make::<offense::StatusAmplify>),
    ("first_strike", make::<offense::FirstStrike>),
    ("berserk", make::<offense::Berserk>),
    // Support
    ("heal", make::<support::Heal>),
    ("shield", make::<support::Shield>),
    ("cleanse", make::<support::Cleanse>),
    ("dispel", make::<support::Dispel>),
    ("buff", make::<support::BuffSkill>),
    ("debuff", make::<support::DebuffSkill>),
    ("lifesteal", make::<support::Lifesteal>),
    ("drain", make::<support::Drain>),
    ("invulnerable", make::<support::Invulnerable>),
    // Status
    ("status", make::<status::ApplyStatus>),
    ("combo_builder", make::<status::ComboBuilder>),
    // Passive
    ("passive_buff", make::<passive::PassiveBuff>),
    ("passive_regen", make::<passive::PassiveRegen>),
    ("passive_shield", make::<passive::PassiveShield>),
    ("thorns", make::<passive::Thorns>),
    ("reflect", make::<passive::Reflect>),
    ("revive", make::<passive::Revive>),
    ("turn_scaling", make::<passive::TurnScaling>),
    ("counter_stance", make::<passive::CounterStance>),
    ("evasion_boost", make::<passive::EvasionBoost>),
    ("last_stand", make::<passive::LastStand>),
    ("draw_boost", make::<passive::DrawBoost>),
    ("victory_heal", make::<passive::VictoryHeal>),
    // Elemental
    ("stat_defense", make::<elemental::StatDefense>),
    ("stat_elemental_damage", make::<elemental::StatElementalDamage>),
    ("elemental_resistance", make::<elemental::ElementalResistance>),
    ("elemental_immunity", make::<elemental::ElementalImmunity>),
    ("element_shift", make::<elemental::ElementShift>),
    // Aura
    ("aura_buff", make::<aura::AuraBuff>),
    ("aura_debuff", make::<aura::AuraDebuff>),
    ("aura_status", make::<aura::AuraStatus>),
];

/// A configured component inside a skill
#[derive(Debug)]
pub struct BoundComponent {
    pub tag: String,
    pub priority: i32,
    pub component: Box<dyn SkillComponent>,
}

/// Tag to constructor map
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    factories: HashMap<&'static str, Factory>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ComponentRegistry {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (tag, factory) in BUILTIN {
            registry.register(tag, *factory);
        }
        registry
    }

    pub fn register(&mut self, tag: &'static str, factory: Factory) {
        self.factories.insert(tag, factory);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Build and configure a component; unknown tags are rejected
    pub fn create(
        &self,
        tag: &str,
        config: &ComponentConfig,
        skill_name: &str,
        priority: i32,
    ) -> Result<BoundComponent, ConfigError> {
        let factory = self.factories.get(tag).ok_or_else(|| ConfigError::UnknownTag {
            tag: tag.to_string(),
            skill: skill_name.to_string(),
        })?;

        let mut component = factory();
        Configure::configure(&mut *component, config).map_err(|reason| ConfigError::Malformed {
            skill: skill_name.to_string(),
            tag: tag.to_string(),
            reason,
        })?;

        Ok(BoundComponent {
            tag: tag.to_string(),
            priority,
            component,
        })
    }
}
