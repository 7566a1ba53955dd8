//! Status type configuration loading

use super::ConfigError;
use crate::status::{StatusCatalog, StatusConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for status configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusesConfig {
    pub statuses: Vec<StatusConfig>,
}

impl StatusesConfig {
    /// Overlay the listed types on the built-in catalog
    fn into_catalog(self) -> Result<StatusCatalog, ConfigError> {
        let mut catalog = StatusCatalog::with_defaults();
        for mut status in self.statuses {
            if status.max_stacks == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "status '{}' must allow at least one stack",
                    status.kind.display_name()
                )));
            }
            if status.percent_per_stack < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "status '{}' has negative tick damage",
                    status.kind.display_name()
                )));
            }
            if status.name.is_empty() {
                status.name = status.kind.display_name().to_string();
            }
            catalog.register(status);
        }
        Ok(catalog)
    }
}

/// Load status configurations from a TOML file
pub fn load_status_configs(path: &Path) -> Result<StatusCatalog, ConfigError> {
    let config: StatusesConfig = super::load_toml(path)?;
    config.into_catalog()
}

/// Load status configurations from a TOML string
pub fn parse_status_configs(content: &str) -> Result<StatusCatalog, ConfigError> {
    let config: StatusesConfig = super::parse_toml(content)?;
    config.into_catalog()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKind;
    use crate::status::StatusKind;
    use crate::types::Element;

    #[test]
    fn test_parse_statuses() {
        let toml = r#"
[[statuses]]
kind = "burn"
name = "Scorch"
max_stacks = 3
percent_per_stack = 0.05
default_duration = 4
element = "fire"

[[statuses]]
kind = "slow"
max_stacks = 2

[[statuses.modifiers]]
stat = "speed"
per_stack = -0.1
"#;

        let catalog = parse_status_configs(toml).unwrap();
        let burn = catalog.config_or_default(StatusKind::Burn);
        assert_eq!(burn.name, "Scorch");
        assert_eq!(burn.max_stacks, 3);
        assert_eq!(burn.default_duration, 4);
        assert_eq!(burn.element, Element::Fire);

        let slow = catalog.config_or_default(StatusKind::Slow);
        assert_eq!(slow.name, "Slow");
        assert_eq!(slow.modifiers.len(), 1);
        assert_eq!(slow.modifiers[0].stat, StatKind::Speed);

        // untouched entries keep their built-in values
        assert!(catalog.get(StatusKind::Poison).is_some());
    }

    #[test]
    fn test_zero_stacks_rejected() {
        let toml = r#"
[[statuses]]
kind = "stun"
max_stacks = 0
"#;
        let err = parse_status_configs(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let toml = r#"
[[statuses]]
kind = "petrify"
"#;
        assert!(matches!(
            parse_status_configs(toml),
            Err(ConfigError::ParseError(_))
        ));
    }
}
