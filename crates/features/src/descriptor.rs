//! Deployment descriptors: string attributes per aspect that override annotations.

use crate::aspect::Aspect;
use crate::error::FeatureError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Form layout information carried by a class descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_area: Option<String>,
}

/// One aspect's attributes on one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectDescriptor {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormDescriptor>,
}

impl AspectDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_form_root(mut self, area: impl Into<String>) -> Self {
        self.form = Some(FormDescriptor {
            root_area: Some(area.into()),
        });
        self
    }
}

/// Descriptor of a single element (action, event) keyed by aspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aspects: IndexMap<Aspect, AspectDescriptor>,
}

impl ElementDescriptor {
    pub fn on(mut self, aspect: Aspect, descriptor: AspectDescriptor) -> Self {
        self.aspects.insert(aspect, descriptor);
        self
    }

    pub fn aspect(&self, aspect: Aspect) -> Option<&AspectDescriptor> {
        self.aspects.get(&aspect)
    }
}

/// Descriptor of a field, including its events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aspects: IndexMap<Aspect, AspectDescriptor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub events: IndexMap<String, ElementDescriptor>,
}

impl FieldDescriptor {
    pub fn on(mut self, aspect: Aspect, descriptor: AspectDescriptor) -> Self {
        self.aspects.insert(aspect, descriptor);
        self
    }

    pub fn aspect(&self, aspect: Aspect) -> Option<&AspectDescriptor> {
        self.aspects.get(&aspect)
    }

    pub fn event(&self, name: &str) -> Option<&ElementDescriptor> {
        self.events.get(name)
    }
}

/// Descriptor of a class with its members.
///
/// Stored as RON, e.g.
///
/// ```ron
/// (
///     aspects: { view: (attributes: { "render": "menu" }) },
///     fields: { "name": (aspects: { view: (attributes: { "visible": "false" }) }) },
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aspects: IndexMap<Aspect, AspectDescriptor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldDescriptor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub actions: IndexMap<String, ElementDescriptor>,
}

impl ClassDescriptor {
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn on(mut self, aspect: Aspect, descriptor: AspectDescriptor) -> Self {
        self.aspects.insert(aspect, descriptor);
        self
    }

    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    pub fn action(mut self, name: impl Into<String>, descriptor: ElementDescriptor) -> Self {
        self.actions.insert(name.into(), descriptor);
        self
    }

    pub fn aspect(&self, aspect: Aspect) -> Option<&AspectDescriptor> {
        self.aspects.get(&aspect)
    }

    /// Names used in the descriptor that do not exist on the class.
    pub fn unknown_members(&self, fields: &[&str], actions: &[&str]) -> Vec<FeatureError> {
        let fields = self
            .fields
            .keys()
            .filter(|name| !fields.contains(&name.as_str()));
        let actions = self
            .actions
            .keys()
            .filter(|name| !actions.contains(&name.as_str()));
        fields
            .chain(actions)
            .map(|name| FeatureError::UnknownMember { name: name.clone() })
            .collect()
    }
}
