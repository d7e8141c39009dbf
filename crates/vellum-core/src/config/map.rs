use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::value::ConfigValue;
use crate::error::{Result, VellumError};

/// Site configuration: upper-case top-level keys mapped to values.
///
/// Keys keep the order they were inserted or read in. Nested mappings are
/// reachable with dotted paths (`AUTHOR.NAME`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    #[serde(flatten)]
    inner: IndexMap<String, ConfigValue>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `config.yaml` document. An empty document is an empty map.
    ///
    /// # Errors
    ///
    /// A parse error when the document is not YAML or its root is not a
    /// mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(yaml).map_err(|e| VellumError::parse_error("config.yaml", e.to_string()))
    }

    /// Serializes the map for template engines that take a JSON context.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| VellumError::internal(e.to_string()))
    }

    pub fn as_inner(&self) -> &IndexMap<String, ConfigValue> {
        &self.inner
    }

    pub(crate) fn as_inner_mut(&mut self) -> &mut IndexMap<String, ConfigValue> {
        &mut self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Removes a top-level key; the remaining keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.inner.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Looks up a top-level key or a dotted path into nested mappings.
    ///
    /// ```
    /// # use vellum_core::ConfigMap;
    /// let map = ConfigMap::from_yaml("AUTHOR:\n  NAME: Jane\n").unwrap();
    /// assert_eq!(map.get_str("AUTHOR.NAME"), Some("Jane"));
    /// ```
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        segments.try_fold(self.inner.get(first)?, |value, segment| match value {
            ConfigValue::Object(map) => map.get(segment),
            _ => None,
        })
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn get_str_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.get_str(path).unwrap_or(default)
    }

    /// Integer value; quoted numbers such as `'10'` are accepted.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }
}
