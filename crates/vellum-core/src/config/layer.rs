use crate::config::map::ConfigMap;
use serde::{Deserialize, Serialize};

/// One named layer of site configuration.
///
/// A layer usually corresponds to the process-level defaults, the
/// repository's `config.yaml`, or a set of mode-specific overrides.
/// Layers are merged by [`ConfigLayerList`](crate::merge::ConfigLayerList)
/// in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    /// The name of the layer (e.g., "config.yaml").
    pub name: String,

    /// Where the layer came from (revision id, file path, ...).
    #[serde(default)]
    pub origin: String,

    /// Priority of this layer. Higher values take precedence.
    #[serde(default)]
    pub priority: i32,

    /// The actual configuration values.
    pub config: ConfigMap,
}

impl ConfigLayer {
    /// Creates a new layer with priority 0.
    pub fn new(name: impl Into<String>, config: ConfigMap) -> Self {
        Self {
            name: name.into(),
            origin: String::new(),
            priority: 0,
            config,
        }
    }

    /// Sets the priority of the layer.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the origin of the layer.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Drops top-level keys this layer is not allowed to override.
    pub fn without_keys(mut self, keys: &[&str]) -> Self {
        for key in keys {
            self.config.remove(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_keys() {
        let mut config = ConfigMap::new();
        config.insert("REVISION", "working_dir");
        config.insert("TITLE", "blog");

        let layer = ConfigLayer::new("config.yaml", config)
            .with_priority(10)
            .with_origin("abc123")
            .without_keys(&["REVISION", "CHANGECTX"]);

        assert_eq!(layer.priority, 10);
        assert_eq!(layer.origin, "abc123");
        assert!(layer.config.get("REVISION").is_none());
        assert_eq!(layer.config.get_str("TITLE"), Some("blog"));
    }
}
