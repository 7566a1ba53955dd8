//! Configuration loading from TOML and JSON files

mod constants;
mod definitions;
mod statuses;
mod synergies;

pub use constants::{
    CombatConstants, CritConstants, DamageConstants, EncounterConstants, GaugeConstants,
    HitConstants, ResistanceConstants,
};
pub use definitions::{
    default_monsters, default_skill_book, load_monster_definitions, load_skill_book,
    parse_monster_definitions, parse_skill_book_json, parse_skill_book_toml, parse_skill_blob,
    MonsterDefinition, SkillDefinition,
};
pub use statuses::{load_status_configs, parse_status_configs};
pub use synergies::{default_synergies, load_synergy_table, parse_synergy_table};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Load-time error: definitions that cannot be turned into a runnable encounter
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unknown component tag '{tag}' in skill '{skill}'")]
    UnknownTag { tag: String, skill: String },
    #[error("Malformed '{tag}' component in skill '{skill}': {reason}")]
    Malformed {
        skill: String,
        tag: String,
        reason: String,
    },
    #[error("Unknown skill id '{0}'")]
    UnknownSkill(String),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    parse_toml(&fs::read_to_string(path)?)
}

pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}

pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Load a definition file, picking the format from its extension
pub fn load_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&content),
        _ => parse_toml(&content),
    }
}
