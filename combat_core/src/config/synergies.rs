//! Synergy table loading

use super::ConfigError;
use crate::synergy::SynergyTable;
use std::path::Path;

fn validate(mut table: SynergyTable) -> Result<SynergyTable, ConfigError> {
    for group in &table.groups {
        if group.keyword.is_empty() {
            return Err(ConfigError::ValidationError(
                "synergy group with an empty keyword".to_string(),
            ));
        }
        if let Some(tier) = group.tiers.iter().find(|t| t.threshold == 0) {
            return Err(ConfigError::ValidationError(format!(
                "synergy tier '{}' needs a threshold of at least 1",
                tier.name
            )));
        }
    }
    table.normalize();
    Ok(table)
}

/// Load a synergy table from a TOML file
pub fn load_synergy_table(path: &Path) -> Result<SynergyTable, ConfigError> {
    validate(super::load_toml(path)?)
}

/// Load a synergy table from a TOML string
pub fn parse_synergy_table(content: &str) -> Result<SynergyTable, ConfigError> {
    validate(super::parse_toml(content)?)
}

/// The bundled synergy table
pub fn default_synergies() -> Result<SynergyTable, ConfigError> {
    parse_synergy_table(include_str!("../../config/synergies.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_synergies() {
        let toml = r#"
[[groups]]
keyword = "fire"

[[groups.tiers]]
name = "Kindling"
threshold = 2
bonus = { damage = 1.1 }

[[groups.tiers]]
name = "Inferno"
threshold = 4
bonus = { damage = 1.3 }

[[combos]]
name = "Battle Medic"
conditions = { __attack_count__ = 1, __heal_buff_count__ = 1 }
bonus = { heal = 1.2 }
"#;
        let table = parse_synergy_table(toml).unwrap();
        assert_eq!(table.groups[0].tiers[0].name, "Inferno");
        assert!((table.combos[0].bonus.heal - 1.2).abs() < f64::EPSILON);
        assert!((table.combos[0].bonus.damage - 1.0).abs() < f64::EPSILON);

        let counts = HashMap::from([("fire".to_string(), 3)]);
        let active = table.active_for_counts(&counts);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Kindling");
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let toml = r#"
[[groups]]
keyword = "ice"

[[groups.tiers]]
name = "Chill"
threshold = 0
"#;
        assert!(matches!(
            parse_synergy_table(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_default_synergies_load() {
        let table = default_synergies().unwrap();
        assert!(!table.is_empty());
    }
}
