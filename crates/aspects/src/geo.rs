use features::{Aspect, GeoFieldFeatures};
use schema::{AspectConfigurator, ConfigReport, Owner, SchemaField, Sources};

/// Map rendering features. Only fields carry them.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoAspect;

impl AspectConfigurator for GeoAspect {
    fn aspect(&self) -> Aspect {
        Aspect::Geo
    }

    fn config_field(
        &self,
        _owner: &Owner<'_>,
        field: &mut SchemaField,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        if sources.annotation.is_none() && sources.getter.is_none() && sources.descriptor.is_none() {
            return;
        }
        sources.apply_into(field.features.get_mut::<GeoFieldFeatures>(), report);
    }
}
