use features::{Aspect, CoreFieldFeatures};
use schema::{AspectConfigurator, ConfigReport, Owner, SchemaField, Sources};

/// Structural field features (`embedded`, `expand`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreAspect;

impl AspectConfigurator for CoreAspect {
    fn aspect(&self) -> Aspect {
        Aspect::Core
    }

    fn config_field(
        &self,
        _owner: &Owner<'_>,
        field: &mut SchemaField,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        sources.apply_into(field.features.get_mut::<CoreFieldFeatures>(), report);
    }
}
