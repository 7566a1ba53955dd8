//! Component configuration blobs

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One component entry of a skill definition, minus its `tag` and `priority`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentConfig {
    fields: Map<String, Value>,
}

impl ComponentConfig {
    pub fn new(fields: Map<String, Value>) -> Self {
        ComponentConfig { fields }
    }

    /// Split a raw definition entry into tag, priority and fields
    pub fn from_entry(mut entry: Map<String, Value>) -> Result<(String, Option<i32>, Self), String> {
        let tag = match entry.remove("tag") {
            Some(Value::String(tag)) => tag,
            Some(other) => return Err(format!("tag must be a string, got {}", other)),
            None => return Err("missing tag".to_string()),
        };
        let priority = match entry.remove("priority") {
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|p| i32::try_from(p).ok())
                .map(Some)
                .ok_or_else(|| format!("priority out of range: {}", n))?,
            Some(other) => return Err(format!("priority must be an integer, got {}", other)),
            None => None,
        };
        Ok((tag, priority, ComponentConfig::new(entry)))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Deserialize the fields into a component struct
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| e.to_string())
    }
}

/// Initializes a freshly constructed component from its definition
///
/// Missing fields keep the component's defaults.
pub trait Configure {
    fn configure(&mut self, config: &ComponentConfig) -> Result<(), String>;
}

impl<T: DeserializeOwned> Configure for T {
    fn configure(&mut self, config: &ComponentConfig) -> Result<(), String> {
        *self = config.parse()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    #[serde(default)]
    struct Sample {
        ratio: f64,
        count: u32,
    }

    fn entry(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_entry_splits_tag_and_priority() {
        let (tag, priority, config) =
            ComponentConfig::from_entry(entry(json!({"tag": "attack", "priority": 5, "ratio": 1.5})))
                .unwrap();
        assert_eq!(tag, "attack");
        assert_eq!(priority, Some(5));
        assert!(config.get("tag").is_none());
        assert!(config.get("ratio").is_some());
    }

    #[test]
    fn test_missing_tag() {
        let err = ComponentConfig::from_entry(entry(json!({"ratio": 1.0}))).unwrap_err();
        assert!(err.contains("missing tag"));
    }

    #[test]
    fn test_configure_defaults_missing_fields() {
        let (_, _, config) =
            ComponentConfig::from_entry(entry(json!({"tag": "x", "ratio": 2}))).unwrap();
        let mut sample = Sample::default();
        sample.configure(&config).unwrap();
        assert_eq!(sample, Sample { ratio: 2.0, count: 0 });
    }

    #[test]
    fn test_configure_rejects_wrong_type() {
        let (_, _, config) =
            ComponentConfig::from_entry(entry(json!({"tag": "x", "count": "many"}))).unwrap();
        let mut sample = Sample::default();
        assert!(sample.configure(&config).is_err());
    }
}
