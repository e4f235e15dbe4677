//! Class descriptions handed over by the introspection layer.

use crate::element::FieldType;
use crate::name::ClassName;
use features::{Annotation, Annotations, Aspect, ClassDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: FieldType,
    pub annotations: Annotations,
    /// Annotations found on the accessor, applied after the field's own.
    pub getter_annotations: Annotations,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Annotations::new(),
            getter_annotations: Annotations::new(),
        }
    }

    pub fn annotate(mut self, aspect: Aspect, annotation: Annotation) -> Self {
        self.annotations = self.annotations.on(aspect, annotation);
        self
    }

    pub fn annotate_getter(mut self, aspect: Aspect, annotation: Annotation) -> Self {
        self.getter_annotations = self.getter_annotations.on(aspect, annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub name: String,
    pub parameters: usize,
    pub return_type: Option<String>,
    pub annotations: Annotations,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: 0,
            return_type: None,
            annotations: Annotations::new(),
        }
    }

    pub fn parameters(mut self, count: usize) -> Self {
        self.parameters = count;
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn annotate(mut self, aspect: Aspect, annotation: Annotation) -> Self {
        self.annotations = self.annotations.on(aspect, annotation);
        self
    }
}

/// Everything the configuration pipeline needs to know about one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub name: ClassName,
    pub superclass: Option<ClassName>,
    pub annotations: Annotations,
    pub descriptor: Option<ClassDescriptor>,
    pub fields: Vec<FieldDefinition>,
    pub actions: Vec<ActionDefinition>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            annotations: Annotations::new(),
            descriptor: None,
            fields: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<ClassName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn annotate(mut self, aspect: Aspect, annotation: Annotation) -> Self {
        self.annotations = self.annotations.on(aspect, annotation);
        self
    }

    pub fn descriptor(mut self, descriptor: ClassDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn action(mut self, action: ActionDefinition) -> Self {
        self.actions.push(action);
        self
    }
}
