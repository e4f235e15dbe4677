//! Applying annotations and descriptors to a record.

use crate::annotation::{Annotation, AnnotationValue};
use crate::descriptor::AspectDescriptor;
use crate::error::FeatureError;
use crate::record::{FeatureKey, FeatureRecord};
use crate::value::FeatureValue;
use tracing::warn;

/// Where a feature value came from, ordered by precedence (later wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureSource {
    /// Declared when the record was built.
    Default,
    Annotation,
    /// Deployment time override.
    Descriptor,
}

/// Copy every written attribute of `annotation` into `record`.
///
/// Attributes holding their unset sentinel leave the slot untouched. Each attribute is applied on
/// its own; a failure is returned and logged and the slot keeps its previous value.
pub fn apply_annotation<R: FeatureRecord>(
    record: &mut R,
    annotation: Option<&Annotation>,
) -> Vec<FeatureError> {
    let Some(annotation) = annotation else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (name, value) in annotation.iter() {
        if value.is_unset() {
            continue;
        }
        let result = R::key_or_err(name).and_then(|key| match value {
            AnnotationValue::Text(raw) => record.set_raw(key, raw),
            AnnotationValue::Flag(flag) => {
                let flag = *flag == crate::Tristate::True;
                record.set(key, FeatureValue::Bool(flag))
            }
            AnnotationValue::Int(number) => record.set(key, FeatureValue::Int(*number)),
            AnnotationValue::List(items) => record.set(key, FeatureValue::List(items.clone())),
        });
        if let Err(err) = result {
            warn!(aspect = %R::ASPECT, source = ?FeatureSource::Annotation, "{err}");
            errors.push(err);
        }
    }
    errors
}

/// Copy every attribute present in `descriptor` into `record`, parsed per declared type.
pub fn apply_descriptor<R: FeatureRecord>(
    record: &mut R,
    descriptor: Option<&AspectDescriptor>,
) -> Vec<FeatureError> {
    let Some(descriptor) = descriptor else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (name, raw) in &descriptor.attributes {
        let result = R::key_or_err(name).and_then(|key| record.set_raw(key, raw));
        if let Err(err) = result {
            warn!(aspect = %R::ASPECT, source = ?FeatureSource::Descriptor, "{err}");
            errors.push(err);
        }
    }
    errors
}

/// Apply both sources in precedence order.
pub fn resolve<R: FeatureRecord>(
    record: &mut R,
    annotation: Option<&Annotation>,
    descriptor: Option<&AspectDescriptor>,
) -> Vec<FeatureError> {
    let mut errors = apply_annotation(record, annotation);
    errors.extend(apply_descriptor(record, descriptor));
    errors
}

/// Which source supplied the effective value of `key`, given the sources that were applied.
pub fn source_of<R: FeatureRecord>(
    key: R::Key,
    annotation: Option<&Annotation>,
    descriptor: Option<&AspectDescriptor>,
) -> FeatureSource {
    let name = key.name();
    if descriptor.is_some_and(|d| d.attributes.contains_key(name)) {
        FeatureSource::Descriptor
    } else if annotation
        .and_then(|a| a.get(name))
        .is_some_and(|value| !value.is_unset())
    {
        FeatureSource::Annotation
    } else {
        FeatureSource::Default
    }
}
