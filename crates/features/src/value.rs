//! Typed feature values.
//!
//! Records store their slots with concrete Rust types. [`FeatureValue`] is the type-erased
//! form used when a feature is addressed by key rather than by field (descriptor application,
//! dynamic reads from renderers).

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// The declared type of a feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FeatureType {
    Bool,
    Int,
    Text,
    List,
}

/// A feature value with its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl FeatureValue {
    pub fn ty(&self) -> FeatureType {
        match self {
            FeatureValue::Bool(_) => FeatureType::Bool,
            FeatureValue::Int(_) => FeatureType::Int,
            FeatureValue::Text(_) => FeatureType::Text,
            FeatureValue::List(_) => FeatureType::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FeatureValue::List(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Bool(value) => write!(f, "{value}"),
            FeatureValue::Int(value) => write!(f, "{value}"),
            FeatureValue::Text(value) => f.write_str(value),
            FeatureValue::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<Vec<String>> for FeatureValue {
    fn from(value: Vec<String>) -> Self {
        FeatureValue::List(value)
    }
}

/// Rust types that can back a feature slot.
pub trait FeatureData: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    const TYPE: FeatureType;

    fn into_value(self) -> FeatureValue;

    fn from_value(value: FeatureValue) -> Option<Self>;

    /// Parse the textual form used by descriptors.
    fn parse(raw: &str) -> Result<Self, String>;
}

impl FeatureData for bool {
    const TYPE: FeatureType = FeatureType::Bool;

    fn into_value(self) -> FeatureValue {
        FeatureValue::Bool(self)
    }

    fn from_value(value: FeatureValue) -> Option<Self> {
        value.as_bool()
    }

    fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(format!("expected true or false, found {other:?}")),
        }
    }
}

impl FeatureData for i64 {
    const TYPE: FeatureType = FeatureType::Int;

    fn into_value(self) -> FeatureValue {
        FeatureValue::Int(self)
    }

    fn from_value(value: FeatureValue) -> Option<Self> {
        value.as_int()
    }

    fn parse(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<i64>().map_err(|e| e.to_string())
    }
}

impl FeatureData for String {
    const TYPE: FeatureType = FeatureType::Text;

    fn into_value(self) -> FeatureValue {
        FeatureValue::Text(self)
    }

    fn from_value(value: FeatureValue) -> Option<Self> {
        match value {
            FeatureValue::Text(value) => Some(value),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FeatureData for Vec<String> {
    const TYPE: FeatureType = FeatureType::List;

    fn into_value(self) -> FeatureValue {
        FeatureValue::List(self)
    }

    fn from_value(value: FeatureValue) -> Option<Self> {
        match value {
            FeatureValue::List(values) => Some(values),
            // A single name is accepted where a list is expected.
            FeatureValue::Text(value) => Some(util::split_list(&value)),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Result<Self, String> {
        Ok(util::split_list(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_parse_accepts_any_case_and_rejects_garbage() {
        assert_eq!(bool::parse("TRUE"), Ok(true));
        assert_eq!(bool::parse(" false "), Ok(false));
        assert!(bool::parse("yes").is_err());
    }

    #[test]
    fn list_parse_splits_on_commas() {
        assert_eq!(
            Vec::<String>::parse("a, b,,c"),
            Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn text_value_converts_into_single_item_list() {
        let list = Vec::<String>::from_value(FeatureValue::from("name"));
        assert_eq!(list, Some(vec!["name".to_string()]));
    }
}
