//! Property bags for widget persistence.
//!
//! Each widget exposes its stylable and persisted state as a map from
//! property name to [`PropertyValue`]. A theme or save-file layer outside the
//! core turns these maps into its own format; the core only guarantees that
//! reading the map and writing it back reproduces the widget.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    /// A boolean flag.
    Bool(bool),
    /// A floating point number.
    Number(f32),
    /// A signed integer (indices use -1 for "none").
    Integer(i64),
    /// A piece of text.
    Text(String),
    /// A 2D vector.
    Vector2([f32; 2]),
    /// A list of strings.
    TextList(Vec<String>),
}

impl PropertyValue {
    /// Human readable name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Vector2(_) => "vector2",
            Self::TextList(_) => "text list",
        }
    }

    /// Read a boolean.
    pub fn as_bool(&self, name: &str) -> Result<bool, PropertyError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(PropertyError::mismatch(name, "bool", other)),
        }
    }

    /// Read a number; integers are accepted too.
    pub fn as_number(&self, name: &str) -> Result<f32, PropertyError> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Integer(v) => Ok(*v as f32),
            other => Err(PropertyError::mismatch(name, "number", other)),
        }
    }

    /// Read an integer.
    pub fn as_integer(&self, name: &str) -> Result<i64, PropertyError> {
        match self {
            Self::Integer(v) => Ok(*v),
            other => Err(PropertyError::mismatch(name, "integer", other)),
        }
    }

    /// Read text.
    pub fn as_text(&self, name: &str) -> Result<&str, PropertyError> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(PropertyError::mismatch(name, "text", other)),
        }
    }

    /// Read a vector.
    pub fn as_vector2(&self, name: &str) -> Result<[f32; 2], PropertyError> {
        match self {
            Self::Vector2(v) => Ok(*v),
            other => Err(PropertyError::mismatch(name, "vector2", other)),
        }
    }

    /// Read a list of strings.
    pub fn as_text_list(&self, name: &str) -> Result<&[String], PropertyError> {
        match self {
            Self::TextList(v) => Ok(v),
            other => Err(PropertyError::mismatch(name, "text list", other)),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<[f32; 2]> for PropertyValue {
    fn from(value: [f32; 2]) -> Self {
        Self::Vector2(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

/// Property name to value, sorted by name.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Errors raised when applying properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The widget has no property with this name.
    UnknownProperty {
        /// The requested name.
        name: String,
    },
    /// The value has the wrong type for the property.
    TypeMismatch {
        /// The property name.
        name: String,
        /// The type the property stores.
        expected: &'static str,
        /// The type that was provided.
        got: &'static str,
    },
}

impl PropertyError {
    /// Build an [`UnknownProperty`](Self::UnknownProperty) error.
    pub fn unknown(name: &str) -> Self {
        Self::UnknownProperty {
            name: name.to_string(),
        }
    }

    fn mismatch(name: &str, expected: &'static str, got: &PropertyValue) -> Self {
        Self::TypeMismatch {
            name: name.to_string(),
            expected,
            got: got.type_name(),
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty { name } => write!(f, "Unknown property '{name}'"),
            Self::TypeMismatch {
                name,
                expected,
                got,
            } => write!(f, "Property '{name}' expects {expected}, got {got}"),
        }
    }
}

impl std::error::Error for PropertyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        assert_eq!(PropertyValue::from(true).as_bool("Visible"), Ok(true));
        assert_eq!(PropertyValue::from(3i64).as_number("Value"), Ok(3.0));
        assert_eq!(PropertyValue::from("hi").as_text("Text"), Ok("hi"));
        assert_eq!(
            PropertyValue::from([1.0, 2.0]).as_vector2("Position"),
            Ok([1.0, 2.0])
        );
    }

    #[test]
    fn test_type_mismatch() {
        let err = PropertyValue::from("x").as_bool("Enabled").unwrap_err();
        assert_eq!(
            err,
            PropertyError::TypeMismatch {
                name: "Enabled".to_string(),
                expected: "bool",
                got: "text",
            }
        );
        assert_eq!(err.to_string(), "Property 'Enabled' expects bool, got text");
    }

    #[test]
    fn test_map_is_sorted() {
        let mut map = PropertyMap::new();
        map.insert("Value".into(), 1.0f32.into());
        map.insert("Maximum".into(), 10.0f32.into());
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["Maximum".to_string(), "Value".to_string()]);
    }
}
