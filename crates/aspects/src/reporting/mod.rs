//! Reporting aspect and the interface of the report engines.

mod helper;

pub use helper::ReportingFeatures;

use features::render::OBJECT_EMBEDDED;
use features::{Aspect, CoreFieldFeatures, ReportingClassFeatures, ReportingFieldFeatures};
use schema::{
    AspectConfigurator, ConfigReport, Owner, SchemaClass, SchemaField, SchemaRegistry, Sources,
};
use std::sync::Arc;
use tracing::trace;

/// A document generator (PDF, HTML, ...). Implementations live outside this workspace.
pub trait ReportEngine: Send + Sync {
    /// Called after `class` was (re)configured so cached templates can be rebuilt.
    fn refresh(&self, class: &SchemaClass);

    /// Document types this engine produces.
    fn document_types(&self) -> Vec<String> {
        Vec::new()
    }
}

pub struct ReportingAspect {
    engine: Option<Arc<dyn ReportEngine>>,
}

impl ReportingAspect {
    pub fn new(engine: Option<Arc<dyn ReportEngine>>) -> Self {
        Self { engine }
    }
}

impl AspectConfigurator for ReportingAspect {
    fn aspect(&self) -> Aspect {
        Aspect::Reporting
    }

    fn config_class(
        &self,
        class: &mut SchemaClass,
        sources: &Sources<'_>,
        _registry: &SchemaRegistry,
        report: &mut ConfigReport,
    ) {
        sources.apply_into(class.features.get_mut::<ReportingClassFeatures>(), report);
    }

    fn config_field(
        &self,
        _owner: &Owner<'_>,
        field: &mut SchemaField,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        let embedded = field
            .features
            .or_default::<CoreFieldFeatures>()
            .embedded
            .is_true();

        let reporting = field.features.get_mut::<ReportingFieldFeatures>();
        sources.apply_into(reporting, report);

        if embedded && reporting.render.get().is_none() {
            reporting.render.set(OBJECT_EMBEDDED.to_string());
        }
    }

    fn end_config_class(
        &self,
        class: &mut SchemaClass,
        _registry: &SchemaRegistry,
        _report: &mut ConfigReport,
    ) {
        if let Some(engine) = &self.engine {
            trace!(class = %class.name(), "refreshing report engine");
            engine.refresh(class);
        }
    }
}
