pub mod layer;
pub mod map;
pub mod value;

pub use layer::ConfigLayer;
pub use map::ConfigMap;
pub use value::ConfigValue;
