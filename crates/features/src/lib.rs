//! Feature records for schema elements.
//!
//! Every aspect (core, view, flow, reporting, geo) contributes one typed record per kind of
//! schema element. A record is a struct of [`FeatureSlot`]s: each slot carries the default
//! declared when the record is built plus an optional explicit value. Values arrive from three
//! sources, lowest precedence first:
//!
//! 1. the declared default,
//! 2. the annotation attached to the element (skipped while an attribute holds its unset sentinel),
//! 3. the deployment descriptor (string attributes, parsed per feature type).
//!
//! # Example
//!
//! ```ignore
//! use features::{Annotation, AspectDescriptor, FeatureRecord, ViewFieldFeatures};
//!
//! let mut view = ViewFieldFeatures::default();
//! let annotation = Annotation::new().text("render", "select");
//! let descriptor = AspectDescriptor::new().attribute("render", "radio");
//! features::resolve(&mut view, Some(&annotation), Some(&descriptor));
//! assert_eq!(view.render.as_deref(), Some("radio"));
//! ```

pub mod annotation;
pub mod aspect;
pub mod bags;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod record;
pub mod slot;
pub mod source;
pub mod value;

pub use annotation::{Annotation, AnnotationValue, Annotations, Tristate, UNSET_INT, UNSET_TEXT};
pub use aspect::{Aspect, ElementKind};
pub use bags::{ActionFeatures, ClassFeatures, FieldFeatures, HasBag};
pub use catalog::*;
pub use descriptor::{
    AspectDescriptor, ClassDescriptor, ElementDescriptor, FieldDescriptor, FormDescriptor,
};
pub use error::FeatureError;
pub use record::{FeatureKey, FeatureRecord};
pub use slot::FeatureSlot;
pub use source::{FeatureSource, apply_annotation, apply_descriptor, resolve, source_of};
pub use value::{FeatureData, FeatureType, FeatureValue};
