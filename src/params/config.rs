//! Per-species parameter overrides loaded from JSON.
//!
//! ```json
//! {
//!   "cordate": [
//!     { "name": "thickness", "value": 0.02, "minimum": 0.01, "maximum": 0.03 },
//!     { "name": "iterationNumber", "value": 4, "minimum": 3, "maximum": 5 }
//!   ]
//! }
//! ```
//!
//! An entry whose `value` is a JSON integer targets the integer namespace.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::store::ParameterStore;
use crate::core::{Error, Result};

/// A numeric configuration value, integer when written without a fraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Integer(i64),
    Double(f64),
}

impl ConfigValue {
    fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Double(v) => v,
        }
    }
}

/// One parameter definition.
///
/// A missing range defaults to the value itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    pub value: ConfigValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<ConfigValue>,
}

impl ParameterEntry {
    /// Write this entry into `store`, value first, then its range.
    pub fn apply(&self, store: &mut ParameterStore) -> Result<()> {
        match self.value {
            ConfigValue::Integer(value) => {
                let minimum = self.integer_bound(self.minimum, value)?;
                let maximum = self.integer_bound(self.maximum, value)?;
                store.define_integer(&self.name, value, minimum, maximum)
            }
            ConfigValue::Double(value) => {
                let minimum = self.minimum.map_or(value, ConfigValue::as_f64);
                let maximum = self.maximum.map_or(value, ConfigValue::as_f64);
                store.define_double(&self.name, value, minimum, maximum)
            }
        }
    }

    fn integer_bound(&self, bound: Option<ConfigValue>, value: i64) -> Result<i64> {
        match bound {
            None => Ok(value),
            Some(ConfigValue::Integer(b)) => Ok(b),
            Some(ConfigValue::Double(_)) => Err(Error::Config(format!(
                "integer parameter \"{}\" has a fractional bound",
                self.name
            ))),
        }
    }
}

/// Anything that can supply parameter overrides by species name.
pub trait ParameterSource {
    fn entries_for(&self, species: &str) -> Option<&[ParameterEntry]>;

    /// Apply every entry for `species` to `store`; returns how many were applied.
    fn apply_to(&self, species: &str, store: &mut ParameterStore) -> Result<usize> {
        let Some(entries) = self.entries_for(species) else {
            return Ok(0);
        };
        for entry in entries {
            entry.apply(store)?;
        }
        Ok(entries.len())
    }
}

/// JSON document of parameter overrides keyed by species name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterConfig {
    species: HashMap<String, Vec<ParameterEntry>>,
}

impl ParameterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry for `species`
    pub fn insert(&mut self, species: &str, entry: ParameterEntry) {
        self.species.entry(species.to_string()).or_default().push(entry);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from file (sync)
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded parameter overrides for {} species from {:?}", config.species.len(), path);
        Ok(config)
    }

    /// Save to file (sync)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl ParameterSource for ParameterConfig {
    fn entries_for(&self, species: &str) -> Option<&[ParameterEntry]> {
        self.species.get(species).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "cordate": [
            { "name": "thickness", "value": 0.02, "minimum": 0.01, "maximum": 0.03 },
            { "name": "iterationNumber", "value": 4, "minimum": 3, "maximum": 5 },
            { "name": "stemLength", "value": 0.5 }
        ]
    }"#;

    #[test]
    fn test_parse_and_apply() {
        let config = ParameterConfig::from_json(CONFIG).unwrap();
        let mut store = ParameterStore::new();
        let applied = config.apply_to("cordate", &mut store).unwrap();

        assert_eq!(applied, 3);
        assert_eq!(store.double("thickness").unwrap(), 0.02);
        assert_eq!(store.double_range("thickness").unwrap(), (0.01, 0.03));
        assert_eq!(store.integer("iterationNumber").unwrap(), 4);
        assert_eq!(store.integer_range("iterationNumber").unwrap(), (3, 5));
        assert_eq!(store.double_range("stemLength").unwrap(), (0.5, 0.5));
    }

    #[test]
    fn test_unknown_species_applies_nothing() {
        let config = ParameterConfig::from_json(CONFIG).unwrap();
        let mut store = ParameterStore::new();
        assert_eq!(config.apply_to("planar", &mut store).unwrap(), 0);
        assert_eq!(store, ParameterStore::new());
    }

    #[test]
    fn test_fractional_integer_bound_rejected() {
        let config = ParameterConfig::from_json(
            r#"{ "stump": [ { "name": "iterationNumber", "value": 1, "maximum": 2.5 } ] }"#,
        ).unwrap();
        let mut store = ParameterStore::new();
        assert!(matches!(
            config.apply_to("stump", &mut store),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = ParameterConfig::from_json(
            r#"{ "stump": [ { "name": "initialWidth", "value": 0.05, "minimum": 0.1, "maximum": 0.01 } ] }"#,
        ).unwrap();
        let mut store = ParameterStore::new();
        assert!(matches!(
            config.apply_to("stump", &mut store),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        let mut config = ParameterConfig::new();
        config.insert("helical", ParameterEntry {
            name: "turningAngle".to_string(),
            value: ConfigValue::Double(14.0),
            minimum: Some(ConfigValue::Double(12.2)),
            maximum: None,
        });
        config.save(&path).unwrap();
        assert_eq!(ParameterConfig::load(&path).unwrap(), config);
    }
}
