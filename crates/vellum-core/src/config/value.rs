use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// One value of a site's `config.yaml`.
///
/// Mappings keep the key order of the file.
///
/// # Example
///
/// ```
/// use vellum_core::ConfigValue;
///
/// let title: ConfigValue = "My blog".into();
/// assert_eq!(title.as_str(), Some("My blog"));
///
/// let menu: ConfigValue = vec!["home", "about"].into();
/// assert_eq!(menu.to_string(), "home, about");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Wrapped so the enum stays `Eq`.
    Float(OrderedFloat<f64>),
    String(String),
    Array(Vec<ConfigValue>),
    Object(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self { Some(s) } else { None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self { Some(*b) } else { None }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        if let Self::Array(items) = self { Some(items) } else { None }
    }

    /// True for values a template would treat as set: `false`, `0`, `''`,
    /// `null` and empty collections are unset.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => f.0 != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Object(map) => !map.is_empty(),
        }
    }
}

/// Renders the value the way it is substituted into a page: scalars
/// verbatim, sequences comma separated, mappings as JSON.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => b.fmt(f),
            Self::Integer(i) => i.fmt(f),
            Self::Float(v) => v.0.fmt(f),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    item.fmt(f)?;
                }
                Ok(())
            },
            Self::Object(map) => {
                let json = serde_json::to_string(map).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            },
        }
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(impl From<$t> for ConfigValue {
            fn from(v: $t) -> Self {
                Self::Integer(i64::from(v))
            }
        })*
    };
}

integer_from!(i32, i64, u32);

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(OrderedFloat(v))
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(ConfigValue::from(10), ConfigValue::Integer(10));
        assert_eq!(ConfigValue::from(3u32), ConfigValue::Integer(3));
        assert_eq!(ConfigValue::from(".rst").as_str(), Some(".rst"));
        assert_eq!(ConfigValue::from(true).as_bool(), Some(true));
        assert_eq!(ConfigValue::from(1).as_str(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigValue::from("content").to_string(), "content");
        assert_eq!(ConfigValue::from(3).to_string(), "3");
        assert_eq!(ConfigValue::from(1.5).to_string(), "1.5");
        assert_eq!(ConfigValue::from(vec!["a", "b"]).to_string(), "a, b");
        assert_eq!(ConfigValue::Null.to_string(), "");

        let mut map = IndexMap::new();
        map.insert("NAME".to_string(), ConfigValue::from("Jane"));
        assert_eq!(ConfigValue::Object(map).to_string(), r#"{"NAME":"Jane"}"#);
    }

    #[test]
    fn test_is_set() {
        assert!(ConfigValue::from("UA-1234").is_set());
        assert!(!ConfigValue::from("").is_set());
        assert!(!ConfigValue::from(false).is_set());
        assert!(!ConfigValue::from(0).is_set());
        assert!(!ConfigValue::Null.is_set());
        assert!(!ConfigValue::from(Vec::<String>::new()).is_set());
    }

    #[test]
    fn test_yaml_scalars() {
        let v: ConfigValue =
            serde_yaml::from_str("TITLE: Vellum\nRATIO: 1.5\nTAGS: [a, b]\nGA: ''\nX: ~\n").unwrap();

        let ConfigValue::Object(map) = v else {
            panic!("expected a mapping");
        };
        assert_eq!(map["TITLE"].as_str(), Some("Vellum"));
        assert_eq!(map["RATIO"], ConfigValue::from(1.5));
        assert_eq!(map["TAGS"].as_array().map(<[_]>::len), Some(2));
        assert!(!map["GA"].is_set());
        assert_eq!(map["X"], ConfigValue::Null);
    }
}
