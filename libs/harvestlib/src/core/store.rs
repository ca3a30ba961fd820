// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Hierarchical key-value store for component configuration persistence.
//!
//! A [`ConfigSection`] is one node of the tree: an ordered list of scalar
//! entries (keys may repeat) plus named child sections. Components read
//! their own keys from a section handed to them by the owning module and
//! write them back field-for-field on save.
//!
//! Sections are plain serde data, so a whole tree round-trips through
//! JSON or YAML:
//!
//! ```json
//! {
//!   "entries": [
//!     { "key": "rejectable", "value": true },
//!     { "key": "source", "value": "feedA" },
//!     { "key": "source", "value": "feedB" }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{HarvestError, Result};

/// Scalar value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            ConfigValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::String(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

/// One scalar entry of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: ConfigValue,
}

/// Named child node of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChildSection {
    name: String,
    section: ConfigSection,
}

/// One node of the hierarchical config store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Scalar entries in insertion order. Keys may repeat.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entries: Vec<ConfigEntry>,

    /// Child sections in insertion order. Names are unique.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sections: Vec<ChildSection>,
}

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.sections.is_empty()
    }

    /// First value stored under `key`, as a string. Bool values are not
    /// coerced.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value.as_str())
    }

    /// First string under `key`, or `default` when the key is absent.
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// First value under `key` as a bool. String values are parsed
    /// (`"true"` / `"false"`); anything else is a store error.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(entry) = self.entries.iter().find(|e| e.key == key) else {
            return Ok(None);
        };
        match &entry.value {
            ConfigValue::Bool(b) => Ok(Some(*b)),
            ConfigValue::String(s) => s.parse::<bool>().map(Some).map_err(|_| {
                HarvestError::Store(format!("key '{}' is not a boolean: '{}'", key, s))
            }),
        }
    }

    /// Bool under `key`, or `default` when the key is absent.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.value.to_string())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Replace every occurrence of `key` with a single entry.
    pub fn set_property(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.entries.retain(|e| e.key != key);
        self.entries.push(ConfigEntry {
            key: key.to_string(),
            value: value.into(),
        });
    }

    /// Append one occurrence of `key`, keeping any existing ones.
    pub fn add_property(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.entries.push(ConfigEntry {
            key: key.to_string(),
            value: value.into(),
        });
    }

    pub fn child(&self, name: &str) -> Option<&ConfigSection> {
        self.sections
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.section)
    }

    /// Child section under `name`, created empty when absent.
    pub fn child_mut(&mut self, name: &str) -> &mut ConfigSection {
        let index = match self.sections.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(ChildSection {
                    name: name.to_string(),
                    section: ConfigSection::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].section
    }

    pub fn remove_child(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|c| c.name != name);
        self.sections.len() != before
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigSection)> {
        self.sections.iter().map(|c| (c.name.as_str(), &c.section))
    }

    /// Load a section tree from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| HarvestError::Store(format!("failed to parse store JSON: {}", e)))
    }

    /// Load a section tree from a JSON file path.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            HarvestError::Store(format!("failed to open store file '{}': {}", path.display(), e))
        })?;
        serde_json::from_reader(file).map_err(|e| {
            HarvestError::Store(format!(
                "failed to parse store file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HarvestError::Store(format!("failed to serialize store: {}", e)))
    }

    /// Load a section tree from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| HarvestError::Store(format!("failed to parse store YAML: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| HarvestError::Store(format!("failed to serialize store: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_reads_with_defaults() {
        let mut section = ConfigSection::new();
        section.set_property("description", "demo");
        section.set_property("rejectable", true);

        assert_eq!(section.get_string("description"), Some("demo"));
        assert_eq!(section.get_string_or("missing", "fallback"), "fallback");
        assert_eq!(section.get_bool_or("rejectable", false).unwrap(), true);
        assert_eq!(section.get_bool_or("missing", true).unwrap(), true);
    }

    #[test]
    fn test_bool_parse_from_string() {
        let mut section = ConfigSection::new();
        section.set_property("rejectable", "true");
        assert_eq!(section.get_bool("rejectable").unwrap(), Some(true));

        section.set_property("rejectable", "maybe");
        let err = section.get_bool("rejectable").unwrap_err();
        assert!(err.to_string().contains("not a boolean"));
    }

    #[test]
    fn test_repeated_keys_preserve_order() {
        let mut section = ConfigSection::new();
        section.add_property("processor", "filterX");
        section.add_property("processor", "filterY");
        section.add_property("processor", "filterX");

        assert_eq!(
            section.get_string_array("processor"),
            vec!["filterX", "filterY", "filterX"]
        );
    }

    #[test]
    fn test_set_property_replaces_repeated_entries() {
        let mut section = ConfigSection::new();
        section.add_property("source", "feedA");
        section.add_property("source", "feedB");
        section.set_property("source", "feedC");

        assert_eq!(section.get_string_array("source"), vec!["feedC"]);
    }

    #[test]
    fn test_child_auto_creation() {
        let mut root = ConfigSection::new();
        assert!(root.child("p1").is_none());

        root.child_mut("p1").set_property("description", "demo");
        assert_eq!(root.child("p1").unwrap().get_string("description"), Some("demo"));

        assert!(root.remove_child("p1"));
        assert!(!root.remove_child("p1"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut root = ConfigSection::new();
        let p1 = root.child_mut("p1");
        p1.add_property("source", "feedA");
        p1.add_property("processor", "filterX");
        p1.add_property("processor", "filterY");
        p1.set_property("rejectable", true);

        let json = root.to_json().unwrap();
        let reloaded = ConfigSection::from_json_str(&json).unwrap();
        assert_eq!(reloaded, root);
        assert_eq!(
            reloaded.child("p1").unwrap().get_string_array("processor"),
            vec!["filterX", "filterY"]
        );
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut root = ConfigSection::new();
        root.set_property("description", "demo");
        root.set_property("rejectable", false);

        let yaml = root.to_yaml().unwrap();
        let reloaded = ConfigSection::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded, root);
    }

    #[test]
    fn test_invalid_json_is_store_error() {
        let err = ConfigSection::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HarvestError::Store(_)));
    }
}
