//! Skill - an ordered bundle of components executed together

mod book;

pub use book::SkillBook;

use crate::component::{Attack, BoundComponent, ComponentConfig, ComponentRegistry, SkillComponent};
use crate::config::{ConfigError, SkillDefinition};
use crate::context::ActionScope;
use crate::types::Element;
use std::sync::Arc;
use tracing::trace;

/// Tags that never act on their own; a skill made only of these is passive
pub const PASSIVE_TAGS: &[&str] = &[
    "passive_buff",
    "passive_regen",
    "passive_shield",
    "thorns",
    "reflect",
    "revive",
    "turn_scaling",
    "counter_stance",
    "evasion_boost",
    "last_stand",
    "draw_boost",
    "victory_heal",
    "stat_defense",
    "stat_elemental_damage",
    "elemental_resistance",
    "elemental_immunity",
    "aura_buff",
    "aura_debuff",
    "aura_status",
];

/// A loaded skill definition
///
/// Immutable once built and shared between every combatant that equips it.
/// Per-combatant counters live in the encounter's component state store.
#[derive(Debug)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub attribute: Element,
    /// "/"-separated synergy keywords
    pub keywords: String,
    components: Vec<BoundComponent>,
    is_passive: bool,
}

impl Skill {
    /// Build a skill; components are sorted by ascending priority
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        attribute: Element,
        keywords: impl Into<String>,
        mut components: Vec<BoundComponent>,
    ) -> Self {
        components.sort_by_key(|c| c.priority);
        let is_passive = !components.is_empty()
            && components
                .iter()
                .all(|c| PASSIVE_TAGS.contains(&c.tag.as_str()));
        Skill {
            id: id.into(),
            name: name.into(),
            attribute,
            keywords: keywords.into(),
            components,
            is_passive,
        }
    }

    /// Build a skill from its definition, rejecting unknown tags
    pub fn from_definition(
        definition: &SkillDefinition,
        registry: &ComponentRegistry,
    ) -> Result<Self, ConfigError> {
        let name = if definition.name.is_empty() {
            definition.id.clone()
        } else {
            definition.name.clone()
        };
        if definition.components.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "skill '{}' has no components",
                definition.id
            )));
        }

        let mut components = Vec::with_capacity(definition.components.len());
        for entry in &definition.components {
            let (tag, priority, config) =
                ComponentConfig::from_entry(entry.clone()).map_err(|reason| {
                    ConfigError::Malformed {
                        skill: name.clone(),
                        tag: String::new(),
                        reason,
                    }
                })?;
            components.push(registry.create(&tag, &config, &name, priority.unwrap_or(0))?);
        }

        Ok(Skill::new(
            definition.id.clone(),
            name,
            definition.attribute,
            definition.keywords.clone(),
            components,
        ))
    }

    /// Plain single-target attack used when nothing else can be drawn
    pub fn basic_attack(attribute: Element) -> Self {
        Skill::new(
            "basic_attack",
            "Attack",
            attribute,
            "",
            vec![BoundComponent {
                tag: "attack".to_string(),
                priority: 0,
                component: Box::<Attack>::default(),
            }],
        )
    }

    pub fn components(&self) -> &[BoundComponent] {
        &self.components
    }

    pub fn is_passive(&self) -> bool {
        self.is_passive
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.components.iter().any(|c| c.tag == tag)
    }

    pub fn keyword_list(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .split('/')
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keyword_list().any(|k| k == keyword)
    }

    /// Run one hook on every component in priority order
    ///
    /// Returns the non-empty lines the components produced. `scope.current`
    /// and `scope.index` point at the running component for the duration.
    pub fn dispatch<F>(self: &Arc<Self>, scope: &mut ActionScope<'_>, hook: &mut F) -> Vec<String>
    where
        F: FnMut(&dyn SkillComponent, &mut ActionScope<'_>) -> Option<String>,
    {
        let saved_skill = scope.current.replace(Arc::clone(self));
        let saved_index = scope.index;

        let mut lines = Vec::new();
        for (index, bound) in self.components.iter().enumerate() {
            scope.index = index;
            trace!(skill = %self.id, tag = %bound.tag, owner = %scope.owner, "dispatch");
            if let Some(line) = hook(bound.component.as_ref(), &mut *scope) {
                if !line.is_empty() {
                    lines.push(line);
                }
            }
        }

        scope.current = saved_skill;
        scope.index = saved_index;
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> SkillDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_components_sorted_by_priority() {
        let registry = ComponentRegistry::with_builtins();
        let skill = Skill::from_definition(
            &definition(json!({
                "id": "fireball",
                "name": "Fireball",
                "attribute": "fire",
                "components": [
                    {"tag": "status", "status": "burn", "priority": 20},
                    {"tag": "attack", "ap_ratio": 1.2, "is_physical": false, "priority": 10},
                    {"tag": "crit", "rate": 0.1, "priority": 0}
                ]
            })),
            &registry,
        )
        .unwrap();
        let tags: Vec<&str> = skill.components().iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["crit", "attack", "status"]);
        assert!(!skill.is_passive());
        assert_eq!(skill.attribute, Element::Fire);
    }

    #[test]
    fn test_passive_detection() {
        let registry = ComponentRegistry::with_builtins();
        let passive = Skill::from_definition(
            &definition(json!({
                "id": "iron_skin",
                "components": [
                    {"tag": "passive_buff", "defense_percent": 0.2},
                    {"tag": "thorns", "percent": 0.1}
                ]
            })),
            &registry,
        )
        .unwrap();
        assert!(passive.is_passive());
        assert_eq!(passive.name, "iron_skin");

        let mixed = Skill::from_definition(
            &definition(json!({
                "id": "battle_trance",
                "components": [
                    {"tag": "passive_buff", "attack_percent": 0.1},
                    {"tag": "heal", "percent": 0.1}
                ]
            })),
            &registry,
        )
        .unwrap();
        assert!(!mixed.is_passive());
    }

    #[test]
    fn test_unknown_tag_fails_load() {
        let registry = ComponentRegistry::with_builtins();
        let err = Skill::from_definition(
            &definition(json!({
                "id": "mystery",
                "components": [{"tag": "summon_dragon"}]
            })),
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { .. }));
    }

    #[test]
    fn test_empty_skill_rejected() {
        let registry = ComponentRegistry::with_builtins();
        let err = Skill::from_definition(
            &definition(json!({"id": "nothing", "components": []})),
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_keywords() {
        let mut skill = Skill::basic_attack(Element::Neutral);
        skill.keywords = "fire/ burst /".to_string();
        let keywords: Vec<&str> = skill.keyword_list().collect();
        assert_eq!(keywords, vec!["fire", "burst"]);
        assert!(skill.has_keyword("burst"));
        assert!(skill.has_tag("attack"));
    }
}
