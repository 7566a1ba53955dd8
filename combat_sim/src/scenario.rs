//! Scenario files - the player's loadout and the monsters they face

use combat_core::config::{self, ConfigError, MonsterDefinition};
use combat_core::{CombatContext, CombatRules, Combatant, Element, SkillBook, StatBlock, TargetingMode};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// The scenario shipped with the binary
pub const DEMO_SCENARIO: &str = include_str!("../scenarios/demo.toml");

fn default_player_name() -> String {
    "Hero".to_string()
}

fn default_runs() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSpec {
    #[serde(default = "default_player_name")]
    pub name: String,
    #[serde(default)]
    pub attribute: Element,
    #[serde(default)]
    pub stats: StatBlock,
    /// Skill ids in draw order; "" leaves a slot empty
    #[serde(default)]
    pub deck: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// One encounter setup, optionally repeated
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_runs")]
    pub runs: u32,
    #[serde(default)]
    pub targeting: TargetingMode,
    /// Monster ids, one combatant per entry
    pub monsters: Vec<String>,
    pub player: PlayerSpec,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        config::load_toml(path)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        config::parse_toml(content)
    }

    pub fn demo() -> Result<Self, ConfigError> {
        Self::parse(DEMO_SCENARIO)
    }

    /// Resolve every id and create a fresh encounter
    pub fn build(
        &self,
        book: &SkillBook,
        bestiary: &[MonsterDefinition],
        rules: Arc<CombatRules>,
    ) -> Result<CombatContext, ConfigError> {
        let deck_size = rules.constants.encounter.deck_size;
        if self.player.deck.len() > deck_size {
            return Err(ConfigError::ValidationError(format!(
                "deck holds at most {} skills, got {}",
                deck_size,
                self.player.deck.len()
            )));
        }

        let equipment = self
            .player
            .equipment
            .iter()
            .map(|id| book.require(id))
            .collect::<Result<Vec<_>, _>>()?;
        let player = Combatant::player(&self.player.name, self.player.stats.clone())
            .with_attribute(self.player.attribute)
            .with_deck(book.deck(&self.player.deck)?)
            .with_equipment(equipment);

        let monsters = self
            .monsters
            .iter()
            .map(|id| {
                let definition = bestiary.iter().find(|m| &m.id == id).ok_or_else(|| {
                    ConfigError::ValidationError(format!("unknown monster id '{}'", id))
                })?;
                Combatant::monster(definition, book)
            })
            .collect::<Result<Vec<_>, _>>()?;

        CombatContext::new(player, monsters, self.targeting, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::config::{default_monsters, default_skill_book};

    fn rules() -> Arc<CombatRules> {
        Arc::new(CombatRules::with_defaults().unwrap())
    }

    #[test]
    fn test_demo_scenario_builds() {
        let scenario = Scenario::demo().unwrap();
        let book = default_skill_book().unwrap();
        let bestiary = default_monsters().unwrap();
        let context = scenario.build(&book, &bestiary, rules()).unwrap();
        assert_eq!(context.roster().len(), 1 + scenario.monsters.len());
    }

    #[test]
    fn test_unknown_monster() {
        let scenario = Scenario::parse(
            r#"
monsters = ["dragon"]

[player]
deck = ["slash"]
"#,
        )
        .unwrap();
        let err = scenario
            .build(&default_skill_book().unwrap(), &default_monsters().unwrap(), rules())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_skill_in_deck() {
        let scenario = Scenario::parse(
            r#"
monsters = ["slime"]

[player]
deck = ["meteor"]
"#,
        )
        .unwrap();
        let err = scenario
            .build(&default_skill_book().unwrap(), &default_monsters().unwrap(), rules())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSkill(ref id) if id == "meteor"));
    }

    #[test]
    fn test_oversized_deck() {
        let scenario = Scenario::parse(
            r#"
monsters = ["slime"]

[player]
deck = ["slash", "slash", "slash", "slash", "slash", "slash", "slash", "slash", "slash", "slash", "slash"]
"#,
        )
        .unwrap();
        assert!(scenario
            .build(&default_skill_book().unwrap(), &default_monsters().unwrap(), rules())
            .is_err());
    }

    #[test]
    fn test_too_many_monsters() {
        let scenario = Scenario::parse(
            r#"
monsters = ["slime", "slime", "slime", "slime"]

[player]
deck = ["slash"]
"#,
        )
        .unwrap();
        assert!(matches!(
            scenario.build(&default_skill_book().unwrap(), &default_monsters().unwrap(), rules()),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
