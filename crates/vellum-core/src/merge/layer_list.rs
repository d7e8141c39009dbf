use crate::config::{ConfigLayer, ConfigMap};
use crate::merge::deep_merge;

/// Ordered collection of [`ConfigLayer`]s that merges into one effective map.
///
/// Layers are applied lowest priority first, so higher priority layers
/// overwrite values from lower priority ones. Layers with equal priority
/// apply in insertion order.
#[derive(Debug, Default)]
pub struct ConfigLayerList {
    layers: Vec<ConfigLayer>,
}

impl ConfigLayerList {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer and keeps the list sorted by priority.
    pub fn add(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
        // stable: equal priorities keep insertion order
        self.layers.sort_by_key(|l| l.priority);
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with(mut self, layer: ConfigLayer) -> Self {
        self.add(layer);
        self
    }

    /// Merges all layers into a single ConfigMap.
    pub fn merge(&self) -> ConfigMap {
        let mut result = ConfigMap::new();

        for layer in &self.layers {
            deep_merge(&mut result, &layer.config);
        }

        result
    }

    /// Returns the layers in merge order.
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, priority: i32, value: &str) -> ConfigLayer {
        let mut config = ConfigMap::new();
        config.insert("TITLE", value);
        ConfigLayer::new(name, config).with_priority(priority)
    }

    #[test]
    fn test_priority_order() {
        let mut list = ConfigLayerList::new();
        list.add(layer("defaults", 0, "low"));
        list.add(layer("overrides", 100, "high"));
        // Added last to verify sorting
        list.add(layer("config.yaml", 10, "mid"));

        let names: Vec<&str> = list.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["defaults", "config.yaml", "overrides"]);

        let merged = list.merge();
        assert_eq!(merged.get_str("TITLE"), Some("high"));
    }

    #[test]
    fn test_equal_priority_keeps_insertion_order() {
        let list = ConfigLayerList::new()
            .with(layer("first", 5, "first"))
            .with(layer("second", 5, "second"));

        assert_eq!(list.merge().get_str("TITLE"), Some("second"));
    }
}
