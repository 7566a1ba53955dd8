//! Skill and monster definition loading
//!
//! Skills come as TOML (`[[skills]]` with `[[skills.components]]`), as JSON
//! (`{"skills": [...]}`), or as a single `{"components": [...]}` blob.

use super::ConfigError;
use crate::component::ComponentRegistry;
use crate::skill::{Skill, SkillBook};
use crate::stats::StatBlock;
use crate::types::Element;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// A skill, passive or equipment piece as written in definition files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    /// Display name; the id is used when empty
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attribute: Element,
    /// "/"-separated synergy keywords
    #[serde(default)]
    pub keywords: String,
    /// Raw component entries, each carrying a `tag`
    pub components: Vec<Map<String, Value>>,
}

/// A monster template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attribute: Element,
    #[serde(default)]
    pub stats: StatBlock,
    /// Skill ids making up the monster's deck
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillsFile {
    #[serde(default)]
    skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonstersFile {
    #[serde(default)]
    monsters: Vec<MonsterDefinition>,
}

/// Single-skill blob: only the components are required
#[derive(Debug, Clone, Deserialize)]
struct SkillBlob {
    components: Vec<Map<String, Value>>,
}

fn build_book(definitions: &[SkillDefinition]) -> Result<SkillBook, ConfigError> {
    let mut book = SkillBook::from_definitions(definitions, &ComponentRegistry::with_builtins())?;
    if book.get("basic_attack").is_none() {
        book.insert(Skill::basic_attack(Element::Neutral));
    }
    Ok(book)
}

/// Parse `[[skills]]` definitions from TOML
///
/// Every book carries `basic_attack`, built in unless a definition overrides it.
pub fn parse_skill_book_toml(content: &str) -> Result<SkillBook, ConfigError> {
    let file: SkillsFile = super::parse_toml(content)?;
    build_book(&file.skills)
}

/// Parse `{"skills": [...]}` definitions from JSON
pub fn parse_skill_book_json(content: &str) -> Result<SkillBook, ConfigError> {
    let file: SkillsFile = super::parse_json(content)?;
    build_book(&file.skills)
}

/// Turn a `{"components": [...]}` blob into a definition under the given id
pub fn parse_skill_blob(id: &str, content: &str) -> Result<SkillDefinition, ConfigError> {
    let blob: SkillBlob = super::parse_json(content)?;
    Ok(SkillDefinition {
        id: id.to_string(),
        name: String::new(),
        attribute: Element::Neutral,
        keywords: String::new(),
        components: blob.components,
    })
}

/// Load a skill book from a `.toml` or `.json` file
pub fn load_skill_book(path: &Path) -> Result<SkillBook, ConfigError> {
    let file: SkillsFile = super::load_by_extension(path)?;
    build_book(&file.skills)
}

/// The bundled skill book
pub fn default_skill_book() -> Result<SkillBook, ConfigError> {
    parse_skill_book_toml(include_str!("../../config/skills.toml"))
}

fn validate_monsters(monsters: Vec<MonsterDefinition>) -> Result<Vec<MonsterDefinition>, ConfigError> {
    let mut seen = HashSet::new();
    for monster in &monsters {
        if !seen.insert(monster.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate monster id '{}'",
                monster.id
            )));
        }
        if monster.stats.max_hp <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "monster '{}' needs positive max_hp",
                monster.id
            )));
        }
    }
    Ok(monsters)
}

/// Parse `[[monsters]]` definitions from TOML
pub fn parse_monster_definitions(content: &str) -> Result<Vec<MonsterDefinition>, ConfigError> {
    let file: MonstersFile = super::parse_toml(content)?;
    validate_monsters(file.monsters)
}

/// Load monster definitions from a `.toml` or `.json` file
pub fn load_monster_definitions(path: &Path) -> Result<Vec<MonsterDefinition>, ConfigError> {
    let file: MonstersFile = super::load_by_extension(path)?;
    validate_monsters(file.monsters)
}

/// The bundled monsters
pub fn default_monsters() -> Result<Vec<MonsterDefinition>, ConfigError> {
    parse_monster_definitions(include_str!("../../config/monsters.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;

    #[test]
    fn test_parse_toml_skills() {
        let toml = r#"
[[skills]]
id = "fireball"
name = "Fireball"
attribute = "fire"
keywords = "fire/magic"

[[skills.components]]
tag = "attack"
ad_ratio = 0.0
ap_ratio = 1.2
is_physical = false

[[skills.components]]
tag = "status"
status = "burn"
priority = 5

[[skills]]
id = "iron_skin"

[[skills.components]]
tag = "stat_defense"
defense = 10
"#;
        let book = parse_skill_book_toml(toml).unwrap();
        let fireball = book.require("fireball").unwrap();
        assert_eq!(fireball.name, "Fireball");
        assert_eq!(fireball.attribute, Element::Fire);
        assert!(fireball.has_keyword("magic"));
        assert!(!fireball.is_passive());

        let skin = book.require("iron_skin").unwrap();
        assert_eq!(skin.name, "iron_skin");
        assert!(skin.is_passive());
    }

    #[test]
    fn test_parse_json_skills() {
        let json = r#"{"skills": [
            {"id": "mend", "components": [{"tag": "heal", "percent": 0.2}]}
        ]}"#;
        let book = parse_skill_book_json(json).unwrap();
        assert!(book.get("mend").is_some());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let json = r#"{"skills": [
            {"id": "odd", "components": [{"tag": "teleport"}]}
        ]}"#;
        let err = parse_skill_book_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { ref tag, .. } if tag == "teleport"));
    }

    #[test]
    fn test_malformed_field_rejected() {
        let json = r#"{"skills": [
            {"id": "bad", "components": [{"tag": "attack", "hit_count": "many"}]}
        ]}"#;
        assert!(matches!(
            parse_skill_book_json(json),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn test_skill_blob() {
        let definition = parse_skill_blob(
            "ward",
            r#"{"components": [{"tag": "stat_defense", "fire_resist": 0.3}]}"#,
        )
        .unwrap();
        assert_eq!(definition.id, "ward");
        assert_eq!(definition.components.len(), 1);
    }

    #[test]
    fn test_defaults_load_and_resolve() {
        let book = default_skill_book().unwrap();
        assert!(book.get("basic_attack").is_some());
        let monsters = default_monsters().unwrap();
        assert!(!monsters.is_empty());
        for definition in &monsters {
            let monster = Combatant::monster(definition, &book).unwrap();
            assert!(monster.is_alive());
        }
    }

    #[test]
    fn test_duplicate_monster_rejected() {
        let toml = r#"
[[monsters]]
id = "slime"
name = "Slime"

[[monsters]]
id = "slime"
name = "Big Slime"
"#;
        assert!(matches!(
            parse_monster_definitions(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
