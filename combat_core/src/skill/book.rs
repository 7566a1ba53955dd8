//! SkillBook - every loaded skill, by id

use super::Skill;
use crate::component::ComponentRegistry;
use crate::config::{ConfigError, SkillDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only skill definitions shared across encounters
#[derive(Debug, Clone, Default)]
pub struct SkillBook {
    skills: HashMap<String, Arc<Skill>>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every definition; the first failure aborts the load
    pub fn from_definitions(
        definitions: &[SkillDefinition],
        registry: &ComponentRegistry,
    ) -> Result<Self, ConfigError> {
        let mut book = Self::new();
        for definition in definitions {
            if book.skills.contains_key(&definition.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate skill id '{}'",
                    definition.id
                )));
            }
            book.insert(Skill::from_definition(definition, registry)?);
        }
        Ok(book)
    }

    pub fn insert(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), Arc::new(skill));
    }

    pub fn get(&self, id: &str) -> Option<Arc<Skill>> {
        self.skills.get(id).cloned()
    }

    /// Look up a skill, failing with `UnknownSkill`
    pub fn require(&self, id: &str) -> Result<Arc<Skill>, ConfigError> {
        self.get(id)
            .ok_or_else(|| ConfigError::UnknownSkill(id.to_string()))
    }

    /// Resolve a deck; empty strings are empty slots
    pub fn deck(&self, ids: &[String]) -> Result<Vec<Option<Arc<Skill>>>, ConfigError> {
        ids.iter()
            .map(|id| {
                if id.is_empty() {
                    Ok(None)
                } else {
                    self.require(id).map(Some)
                }
            })
            .collect()
    }

    /// Overlay another book; later definitions win
    pub fn merge(&mut self, other: SkillBook) {
        self.skills.extend(other.skills);
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
