//! Named collection of interface records

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ifupdown_core::{ConfigError, NetworkInterface, Result, ValidationError};

use crate::multi::MultiParser;

/// Interfaces keyed by name, in insertion order
///
/// Every key equals the `name` of the record stored under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interfaces {
    entries: IndexMap<String, NetworkInterface>,
}

impl Interfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&NetworkInterface> {
        self.entries.get(name)
    }

    /// Mutable access to a record; renaming it breaks the key invariant
    pub fn get_mut(&mut self, name: &str) -> Option<&mut NetworkInterface> {
        self.entries.get_mut(name)
    }

    /// Insert a record under its own name, returning any record it replaced
    pub fn insert(&mut self, iface: NetworkInterface) -> Option<NetworkInterface> {
        self.entries.insert(iface.name.clone(), iface)
    }

    /// Insert a record under `name`, renaming it to match
    pub fn insert_named(
        &mut self,
        name: impl Into<String>,
        mut iface: NetworkInterface,
    ) -> Option<NetworkInterface> {
        iface.name = name.into();
        self.insert(iface)
    }

    pub fn remove(&mut self, name: &str) -> Option<NetworkInterface> {
        self.entries.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NetworkInterface)> {
        self.entries.iter().map(|(name, iface)| (name.as_str(), iface))
    }

    /// Drop every record that fails validation, returning why each was dropped
    pub fn retain_valid(&mut self) -> Vec<(String, ValidationError)> {
        let mut dropped = Vec::new();
        self.entries.retain(|name, iface| match iface.validate() {
            Ok(()) => true,
            Err(e) => {
                dropped.push((name.clone(), e));
                false
            }
        });
        dropped
    }

    /// Parse a whole interfaces document, failing on any block error
    pub fn parse(content: &str) -> std::result::Result<Self, ConfigError> {
        let parser = MultiParser::new();
        parser.write(content.as_bytes());
        parser.parse().into_result()
    }

    /// Decode a JSON object of name to record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Indented JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_compact(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The interfaces document for every valid record
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// Each valid record followed by a blank line; invalid records are skipped
impl fmt::Display for Interfaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, iface) in &self.entries {
            debug_assert_eq!(name, &iface.name);
            match iface.render() {
                Ok(text) => writeln!(f, "{}", text)?,
                Err(e) => log::warn!("{}: skip due to error: {}", name, e),
            }
        }
        Ok(())
    }
}

impl FromStr for Interfaces {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<NetworkInterface> for Interfaces {
    fn from_iter<I: IntoIterator<Item = NetworkInterface>>(iter: I) -> Self {
        let mut interfaces = Self::new();
        for iface in iter {
            interfaces.insert(iface);
        }
        interfaces
    }
}

impl IntoIterator for Interfaces {
    type Item = (String, NetworkInterface);
    type IntoIter = indexmap::map::IntoIter<String, NetworkInterface>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Interfaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Interfaces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = IndexMap::<String, Option<NetworkInterface>>::deserialize(deserializer)?;

        let mut interfaces = Interfaces::new();
        for (key, iface) in raw {
            let Some(mut iface) = iface else {
                log::debug!("dropping null interface '{}'", key);
                continue;
            };
            if !iface.name.is_empty() && iface.name != key {
                log::warn!(
                    "interface '{}' stored under key '{}', using the key",
                    iface.name,
                    key
                );
            }
            iface.allocate();
            interfaces.insert_named(key, iface);
        }

        Ok(interfaces)
    }
}
