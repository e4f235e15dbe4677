//! Source-level annotations attached to schema elements.
//!
//! Annotation attributes always carry a value; an attribute the author did not write holds its
//! type's unset sentinel and is skipped when the annotation is applied.

use crate::aspect::Aspect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel of text (and class reference) attributes that were not written.
pub const UNSET_TEXT: &str = "$unset$";

/// Sentinel of integer attributes that were not written.
pub const UNSET_INT: i64 = i64::MIN;

/// Three-state boolean attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tristate {
    #[default]
    Unset,
    True,
    False,
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Tristate::True } else { Tristate::False }
    }
}

/// The value of one annotation attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Text(String),
    Flag(Tristate),
    Int(i64),
    List(Vec<String>),
}

impl AnnotationValue {
    pub fn is_unset(&self) -> bool {
        match self {
            AnnotationValue::Text(value) => value == UNSET_TEXT,
            AnnotationValue::Flag(value) => *value == Tristate::Unset,
            AnnotationValue::Int(value) => *value == UNSET_INT,
            AnnotationValue::List(values) => values.is_empty(),
        }
    }
}

/// Attributes of one aspect's annotation on one element, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, AnnotationValue::Text(value.into()))
    }

    pub fn flag(self, name: impl Into<String>, value: bool) -> Self {
        self.with(name, AnnotationValue::Flag(value.into()))
    }

    pub fn int(self, name: impl Into<String>, value: i64) -> Self {
        self.with(name, AnnotationValue::Int(value))
    }

    pub fn list<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with(name, AnnotationValue::List(values))
    }

    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// The annotations of one element, one per aspect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(IndexMap<Aspect, Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, aspect: Aspect, annotation: Annotation) -> Self {
        self.0.insert(aspect, annotation);
        self
    }

    pub fn get(&self, aspect: Aspect) -> Option<&Annotation> {
        self.0.get(&aspect)
    }

    pub fn aspects(&self) -> impl Iterator<Item = Aspect> + '_ {
        self.0.keys().copied()
    }
}
