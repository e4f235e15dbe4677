//! Schema model of the domain classes.
//!
//! The introspection layer describes each class as a [`ClassDefinition`]. Registering it with a
//! [`SchemaRegistry`] runs every [`AspectConfigurator`] over the class and its members, which
//! fills the per-aspect feature records, registers synthetic events and finally rebuilds the
//! field dependency graph.

pub mod configurator;
pub mod definition;
pub mod dependency;
pub mod element;
pub mod error;
pub mod name;
pub mod registry;

pub use configurator::{AspectConfigurator, ConfigReport, ConfigWarning, Owner, Sources};
pub use definition::{ActionDefinition, ClassDefinition, FieldDefinition};
pub use element::{
    Cardinality, EventKind, FieldType, SchemaAction, SchemaClass, SchemaEvent, SchemaField,
};
pub use error::SchemaError;
pub use name::ClassName;
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
