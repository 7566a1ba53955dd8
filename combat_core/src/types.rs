//! Core types shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Elemental attribute of a skill, a combatant or a single damage instance
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Ice,
    Lightning,
    Earth,
    Wind,
    Light,
    Dark,
}

impl Element {
    /// Every element, in declaration order
    pub fn all() -> &'static [Element] {
        &[
            Element::Neutral,
            Element::Fire,
            Element::Water,
            Element::Ice,
            Element::Lightning,
            Element::Earth,
            Element::Wind,
            Element::Light,
            Element::Dark,
        ]
    }

    /// Lowercase name as used in definition files
    pub fn name(&self) -> &'static str {
        match self {
            Element::Neutral => "neutral",
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Ice => "ice",
            Element::Lightning => "lightning",
            Element::Earth => "earth",
            Element::Wind => "wind",
            Element::Light => "light",
            Element::Dark => "dark",
        }
    }

    /// Parse a definition-file name
    pub fn from_name(name: &str) -> Option<Element> {
        Element::all().iter().copied().find(|e| e.name() == name)
    }

    /// Elements this one deals bonus damage against
    pub fn strong_against(&self) -> &'static [Element] {
        match self {
            Element::Fire => &[Element::Ice, Element::Wind],
            Element::Water => &[Element::Fire, Element::Earth],
            Element::Ice => &[Element::Wind, Element::Water],
            Element::Lightning => &[Element::Water],
            Element::Earth => &[Element::Lightning],
            Element::Wind => &[Element::Earth],
            Element::Light => &[Element::Dark],
            Element::Dark => &[Element::Light],
            Element::Neutral => &[],
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable small-integer identifier assigned to a combatant when an encounter starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u8);

impl EntityHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which party a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub fn opposing(&self) -> Side {
        match self {
            Side::Player => Side::Monster,
            Side::Monster => Side::Player,
        }
    }
}

/// How a player's single-target skills choose among living monsters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    #[default]
    LowestHp,
    HighestHp,
    Random,
    First,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names_round_trip() {
        for element in Element::all() {
            assert_eq!(Element::from_name(element.name()), Some(*element));
        }
        assert_eq!(Element::from_name("plasma"), None);
    }

    #[test]
    fn test_element_serde_snake_case() {
        let json = serde_json::to_string(&Element::Lightning).unwrap();
        assert_eq!(json, "\"lightning\"");
        let parsed: Element = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(parsed, Element::Dark);
    }

    #[test]
    fn test_side_opposing() {
        assert_eq!(Side::Player.opposing(), Side::Monster);
        assert_eq!(Side::Monster.opposing(), Side::Player);
    }

    #[test]
    fn test_targeting_mode_parse() {
        let mode: TargetingMode = toml::from_str::<toml::Value>("m = \"highest_hp\"")
            .unwrap()
            .get("m")
            .unwrap()
            .clone()
            .try_into()
            .unwrap();
        assert_eq!(mode, TargetingMode::HighestHp);
    }
}
