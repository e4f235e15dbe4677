//! The contract between the configuration pipeline and the aspects.

use crate::element::{SchemaAction, SchemaClass, SchemaEvent, SchemaField};
use crate::name::ClassName;
use crate::registry::SchemaRegistry;
use features::{
    Annotation, Aspect, AspectDescriptor, ClassFeatures, FeatureError, FeatureRecord,
    FeatureValue, HasBag, apply_annotation, apply_descriptor,
};

/// Per-aspect configuration logic.
///
/// For every registered class the pipeline calls, for each configurator in registration order:
/// `begin_config_class`, `config_class`, then per field `config_field` followed by `config_event`
/// for every event of that field, then `config_action` per action and finally
/// `end_config_class`. All hooks must be idempotent for identical inputs.
pub trait AspectConfigurator: Send + Sync {
    fn aspect(&self) -> Aspect;

    fn begin_config_class(&self, _class: &mut SchemaClass, _report: &mut ConfigReport) {}

    fn config_class(
        &self,
        _class: &mut SchemaClass,
        _sources: &Sources<'_>,
        _registry: &SchemaRegistry,
        _report: &mut ConfigReport,
    ) {
    }

    fn config_field(
        &self,
        _owner: &Owner<'_>,
        _field: &mut SchemaField,
        _sources: &Sources<'_>,
        _report: &mut ConfigReport,
    ) {
    }

    fn config_action(
        &self,
        _owner: &Owner<'_>,
        _action: &mut SchemaAction,
        _sources: &Sources<'_>,
        _report: &mut ConfigReport,
    ) {
    }

    fn config_event(
        &self,
        _owner: &Owner<'_>,
        _event: &mut SchemaEvent,
        _sources: &Sources<'_>,
        _report: &mut ConfigReport,
    ) {
    }

    fn end_config_class(
        &self,
        _class: &mut SchemaClass,
        _registry: &SchemaRegistry,
        _report: &mut ConfigReport,
    ) {
    }
}

/// The feature sources of one element for one aspect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sources<'a> {
    /// Path of the element, used in warnings.
    pub element: &'a str,
    pub annotation: Option<&'a Annotation>,
    /// Accessor annotation of a field.
    pub getter: Option<&'a Annotation>,
    pub descriptor: Option<&'a AspectDescriptor>,
}

impl Sources<'_> {
    /// Apply annotation, accessor annotation and descriptor in that order.
    pub fn apply<R: FeatureRecord>(&self, record: &mut R) -> Vec<FeatureError> {
        let mut errors = apply_annotation(record, self.annotation);
        errors.extend(apply_annotation(record, self.getter));
        errors.extend(apply_descriptor(record, self.descriptor));
        errors
    }

    pub fn has_descriptor(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Apply all sources to `record` and keep any failure in `report`.
    pub fn apply_into<R: FeatureRecord>(&self, record: &mut R, report: &mut ConfigReport) {
        let errors = self.apply(record);
        report.record(self.element, errors);
    }
}

/// Read-only view of the class that owns the member being configured.
pub struct Owner<'a> {
    pub(crate) name: &'a ClassName,
    pub(crate) superclass: Option<&'a ClassName>,
    pub(crate) features: &'a ClassFeatures,
    pub(crate) registry: &'a SchemaRegistry,
}

impl Owner<'_> {
    pub fn name(&self) -> &ClassName {
        self.name
    }

    pub fn features(&self) -> &ClassFeatures {
        self.features
    }

    /// Effective class feature, following the superclass chain for inherited features.
    pub fn feature<R>(&self, key: R::Key) -> Option<FeatureValue>
    where
        R: FeatureRecord,
        ClassFeatures: HasBag<R>,
    {
        self.registry
            .resolve_class_feature::<R>(self.features, self.superclass, key)
    }

    pub fn text<R>(&self, key: R::Key) -> Option<String>
    where
        R: FeatureRecord,
        ClassFeatures: HasBag<R>,
    {
        match self.feature::<R>(key) {
            Some(FeatureValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn flag<R>(&self, key: R::Key) -> bool
    where
        R: FeatureRecord,
        ClassFeatures: HasBag<R>,
    {
        matches!(self.feature::<R>(key), Some(FeatureValue::Bool(true)))
    }
}

/// A non-fatal problem found while configuring one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// `Class`, `Class.member` or `Class.field#event`.
    pub element: String,
    pub error: FeatureError,
}

/// Warnings collected during one configuration pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReport {
    warnings: Vec<ConfigWarning>,
}

impl ConfigReport {
    pub fn record(&mut self, element: &str, errors: Vec<FeatureError>) {
        self.warnings
            .extend(errors.into_iter().map(|error| ConfigWarning {
                element: element.to_string(),
                error,
            }));
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn merge(&mut self, other: ConfigReport) {
        self.warnings.extend(other.warnings);
    }
}
