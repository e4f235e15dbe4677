use features::{Aspect, FlowActionFeatures};
use schema::{AspectConfigurator, ConfigReport, Owner, SchemaAction, SchemaEvent, Sources};

/// Navigation features of actions and events.
///
/// `next` is kept as a class name and resolved when the navigator needs it, so it may name a
/// class that is registered later.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowAspect;

impl AspectConfigurator for FlowAspect {
    fn aspect(&self) -> Aspect {
        Aspect::Flow
    }

    fn config_action(
        &self,
        _owner: &Owner<'_>,
        action: &mut SchemaAction,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        sources.apply_into(action.features.get_mut::<FlowActionFeatures>(), report);
    }

    fn config_event(
        &self,
        _owner: &Owner<'_>,
        event: &mut SchemaEvent,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        sources.apply_into(event.features.get_mut::<FlowActionFeatures>(), report);
    }
}
