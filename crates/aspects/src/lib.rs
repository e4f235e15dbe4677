//! The aspect configurators shipped with the framework.
//!
//! Register them on a [`schema::SchemaRegistry`] in the order returned by [`standard`]: the core
//! aspect runs first because view and reporting read its `embedded` and `expand` features.

pub mod core_aspect;
pub mod flow;
pub mod geo;
pub mod reporting;
pub mod view;

pub use core_aspect::CoreAspect;
pub use flow::FlowAspect;
pub use geo::GeoAspect;
pub use reporting::{ReportEngine, ReportingAspect, ReportingFeatures};
pub use view::ViewAspect;

use schema::{AspectConfigurator, SchemaRegistry};
use std::sync::Arc;

/// All configurators in pipeline order.
pub fn standard(report_engine: Option<Arc<dyn ReportEngine>>) -> Vec<Arc<dyn AspectConfigurator>> {
    vec![
        Arc::new(CoreAspect),
        Arc::new(ViewAspect),
        Arc::new(FlowAspect),
        Arc::new(ReportingAspect::new(report_engine)),
        Arc::new(GeoAspect),
    ]
}

/// An empty registry with every standard configurator installed.
pub fn schema_registry(report_engine: Option<Arc<dyn ReportEngine>>) -> SchemaRegistry {
    standard(report_engine)
        .into_iter()
        .fold(SchemaRegistry::builder(), |builder, configurator| {
            builder.with_shared_configurator(configurator)
        })
        .build()
}
