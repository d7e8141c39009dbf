//! Merging of configuration layers.

use indexmap::IndexMap;

use crate::config::{ConfigMap, ConfigValue};

pub mod layer_list;
pub use layer_list::ConfigLayerList;

/// Merges `overlay` into `base`.
///
/// Mappings present on both sides merge key by key, recursively. Any other
/// value from `overlay` (scalars and sequences included) replaces the one in
/// `base`. New keys are appended, so `base` keeps its own key order first.
pub fn deep_merge(base: &mut ConfigMap, overlay: &ConfigMap) {
    merge_maps(base.as_inner_mut(), overlay.as_inner());
}

fn merge_maps(base: &mut IndexMap<String, ConfigValue>, overlay: &IndexMap<String, ConfigValue>) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(ConfigValue::Object(inner)), ConfigValue::Object(overlay_inner)) => {
                merge_maps(inner, overlay_inner);
            },
            (Some(slot), _) => *slot = value.clone(),
            (None, _) => {
                base.insert(key.clone(), value.clone());
            },
        }
    }
}
