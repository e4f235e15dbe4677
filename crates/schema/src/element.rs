//! Schema elements: classes, fields, actions and events.

use crate::name::ClassName;
use features::{ActionFeatures, ClassFeatures, FieldFeatures};
use indexmap::IndexMap;
use std::collections::HashSet;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    Single,
    /// Collections, arrays and maps.
    Multi,
}

/// Declared type of a field as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub name: String,
    pub cardinality: Cardinality,
    /// Built-in value type (text, number, date, ...) rather than a domain class.
    pub primitive: bool,
}

impl FieldType {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Single,
            primitive: true,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Single,
            primitive: false,
        }
    }

    pub fn collection(element: impl Into<String>) -> Self {
        Self {
            name: element.into(),
            cardinality: Cardinality::Multi,
            primitive: false,
        }
    }

    pub fn is_multi_value(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }
}

/// Synthetic events registered on fields by the view aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum EventKind {
    AddInline,
    Add,
    View,
    Edit,
    Remove,
    Up,
    Down,
    Open,
    Reset,
    Search,
}

impl EventKind {
    pub const COLLECTION: [EventKind; 7] = [
        EventKind::AddInline,
        EventKind::Add,
        EventKind::View,
        EventKind::Edit,
        EventKind::Remove,
        EventKind::Up,
        EventKind::Down,
    ];

    pub const REFERENCE: [EventKind; 3] = [EventKind::Open, EventKind::Reset, EventKind::Search];
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEvent {
    kind: EventKind,
    field: String,
    pub features: ActionFeatures,
}

impl SchemaEvent {
    pub fn new(kind: EventKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            features: ActionFeatures::default(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.into()
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    name: String,
    owner: ClassName,
    ty: FieldType,
    has_descriptor: bool,
    pub features: FieldFeatures,
    events: IndexMap<EventKind, SchemaEvent>,
}

impl SchemaField {
    pub fn new(owner: ClassName, name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            owner,
            ty,
            has_descriptor: false,
            features: FieldFeatures::default(),
            events: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &ClassName {
        &self.owner
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_multi_value(&self) -> bool {
        self.ty.is_multi_value()
    }

    /// Whether a deployment descriptor mentions this field.
    pub fn has_descriptor(&self) -> bool {
        self.has_descriptor
    }

    pub(crate) fn set_has_descriptor(&mut self, value: bool) {
        self.has_descriptor = value;
    }

    /// Register an event unless the field already has one of that kind.
    ///
    /// Returns `true` when the event was added.
    pub fn register_event(&mut self, kind: EventKind) -> bool {
        if self.events.contains_key(&kind) {
            return false;
        }
        let event = SchemaEvent::new(kind, self.name.clone());
        self.events.insert(kind, event);
        true
    }

    pub fn event(&self, kind: EventKind) -> Option<&SchemaEvent> {
        self.events.get(&kind)
    }

    pub fn event_mut(&mut self, kind: EventKind) -> Option<&mut SchemaEvent> {
        self.events.get_mut(&kind)
    }

    pub fn events(&self) -> impl Iterator<Item = &SchemaEvent> {
        self.events.values()
    }

    pub(crate) fn events_mut(&mut self) -> impl Iterator<Item = &mut SchemaEvent> {
        self.events.values_mut()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaAction {
    name: String,
    owner: ClassName,
    parameters: usize,
    return_type: Option<String>,
    has_descriptor: bool,
    pub features: ActionFeatures,
}

impl SchemaAction {
    pub fn new(owner: ClassName, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner,
            parameters: 0,
            return_type: None,
            has_descriptor: false,
            features: ActionFeatures::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &ClassName {
        &self.owner
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters
    }

    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    pub fn has_descriptor(&self) -> bool {
        self.has_descriptor
    }

    pub(crate) fn set_signature(&mut self, parameters: usize, return_type: Option<String>) {
        self.parameters = parameters;
        self.return_type = return_type;
    }

    pub(crate) fn set_has_descriptor(&mut self, value: bool) {
        self.has_descriptor = value;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaClass {
    pub(crate) name: ClassName,
    pub(crate) superclass: Option<ClassName>,
    pub features: ClassFeatures,
    pub(crate) fields: IndexMap<String, SchemaField>,
    pub(crate) actions: IndexMap<String, SchemaAction>,
    consumed: HashSet<&'static str>,
    passes: u32,
}

impl SchemaClass {
    pub fn new(name: ClassName, superclass: Option<ClassName>) -> Self {
        Self {
            name,
            superclass,
            features: ClassFeatures::default(),
            fields: IndexMap::new(),
            actions: IndexMap::new(),
            consumed: HashSet::new(),
            passes: 0,
        }
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn superclass(&self) -> Option<&ClassName> {
        self.superclass.as_ref()
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut SchemaField> {
        self.fields.get_mut(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.values()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut SchemaField> {
        self.fields.values_mut()
    }

    pub fn action(&self, name: &str) -> Option<&SchemaAction> {
        self.actions.get(name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut SchemaAction> {
        self.actions.get_mut(name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &SchemaAction> {
        self.actions.values()
    }

    pub fn actions_mut(&mut self) -> impl Iterator<Item = &mut SchemaAction> {
        self.actions.values_mut()
    }

    /// Mark a one-shot rule as fired. Returns `false` if it already fired on this class.
    pub fn consume_once(&mut self, marker: &'static str) -> bool {
        self.consumed.insert(marker)
    }

    pub fn is_consumed(&self, marker: &str) -> bool {
        self.consumed.contains(marker)
    }

    /// Number of completed configuration passes.
    pub fn configuration_passes(&self) -> u32 {
        self.passes
    }

    pub(crate) fn finish_pass(&mut self) {
        self.passes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_are_registered_once_per_kind() {
        let mut field = SchemaField::new(
            ClassName::from("Order"),
            "lines",
            FieldType::collection("OrderLine"),
        );
        assert!(field.register_event(EventKind::Add));
        assert!(!field.register_event(EventKind::Add));
        assert_eq!(field.events().count(), 1);
        assert_eq!(field.event(EventKind::Add).map(|e| e.name()), Some("add"));
        assert_eq!(EventKind::AddInline.to_string(), "addInline");
    }

    #[test]
    fn one_shot_markers_fire_once() {
        let mut class = SchemaClass::new(ClassName::from("Customer"), None);
        assert!(class.consume_once("view.explicitElements"));
        assert!(!class.consume_once("view.explicitElements"));
        assert!(class.is_consumed("view.explicitElements"));
    }
}
