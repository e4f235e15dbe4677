//! View aspect: rendering features plus the derived defaults that depend on the owning class.

use features::render::{ACCORDION, EXPAND, MENU, OBJECT_EMBEDDED};
use features::{
    Aspect, CoreFieldFeatures, ViewActionFeatures, ViewClassFeature, ViewClassFeatures,
    ViewFieldFeatures,
};
use schema::dependency::update_field_dependencies;
use schema::{
    AspectConfigurator, ConfigReport, EventKind, Owner, SchemaAction, SchemaClass, SchemaEvent,
    SchemaField, SchemaRegistry, Sources,
};
use tracing::debug;

/// One-shot marker for the `explicitElements` rule.
pub const EXPLICIT_ELEMENTS_APPLIED: &str = "view.explicitElements";

#[derive(Debug, Default, Clone, Copy)]
pub struct ViewAspect;

impl ViewAspect {
    fn class_render(owner: &Owner<'_>) -> Option<String> {
        owner.text::<ViewClassFeatures>(ViewClassFeature::Render)
    }

    fn explicit_elements(owner: &Owner<'_>) -> bool {
        owner.flag::<ViewClassFeatures>(ViewClassFeature::ExplicitElements)
    }
}

impl AspectConfigurator for ViewAspect {
    fn aspect(&self) -> Aspect {
        Aspect::View
    }

    fn config_class(
        &self,
        class: &mut SchemaClass,
        sources: &Sources<'_>,
        _registry: &SchemaRegistry,
        report: &mut ConfigReport,
    ) {
        let already_applied = class.is_consumed(EXPLICIT_ELEMENTS_APPLIED);
        let view = class.features.get_mut::<ViewClassFeatures>();
        sources.apply_into(view, report);

        let root_area = sources
            .descriptor
            .and_then(|d| d.form.as_ref())
            .and_then(|form| form.root_area.clone());
        if let Some(root_area) = root_area {
            view.form.set(root_area);
        }

        if already_applied {
            view.explicit_elements.set(false);
        }
    }

    fn config_field(
        &self,
        owner: &Owner<'_>,
        field: &mut SchemaField,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        let core = field.features.or_default::<CoreFieldFeatures>();
        let expand = core.expand.is_true();
        let embedded = core.embedded.is_true();
        let multi_value = field.is_multi_value();
        let has_descriptor = field.has_descriptor();

        let view = field.features.get_mut::<ViewFieldFeatures>();
        sources.apply_into(view, report);

        if expand {
            view.visible.set(false);
        }

        if Self::explicit_elements(owner) && !view.visible.is_set() && !has_descriptor {
            view.visible.set(false);
        }

        if embedded && view.render.get().is_none() && !multi_value {
            view.render.set(OBJECT_EMBEDDED.to_string());
        }

        if view.layout.is(EXPAND) {
            view.render.set(OBJECT_EMBEDDED.to_string());
        }

        match Self::class_render(owner).as_deref() {
            Some(MENU) => {
                view.render.set(MENU.to_string());
                view.layout.set(MENU.to_string());
            }
            Some(ACCORDION) => {
                view.render.set(ACCORDION.to_string());
                view.layout.set(ACCORDION.to_string());
            }
            _ => {}
        }

        let events: &[EventKind] = if multi_value {
            &EventKind::COLLECTION
        } else if !field.ty().primitive {
            &EventKind::REFERENCE
        } else {
            &[]
        };
        for kind in events {
            field.register_event(*kind);
        }
    }

    fn config_action(
        &self,
        owner: &Owner<'_>,
        action: &mut SchemaAction,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        let has_signature = action.parameter_count() > 0 || action.return_type().is_some();
        let has_descriptor = action.has_descriptor();

        let view = action.features.get_mut::<ViewActionFeatures>();
        sources.apply_into(view, report);

        if has_signature && !view.visible.is_set() {
            view.visible.set(false);
        }

        if Self::explicit_elements(owner) && !view.visible.is_set() && !has_descriptor {
            view.visible.set(false);
        }

        match Self::class_render(owner).as_deref() {
            Some(MENU) => {
                view.render.set(MENU.to_string());
                view.layout.set(MENU.to_string());
            }
            Some(ACCORDION) => view.layout.set(ACCORDION.to_string()),
            _ => {}
        }
    }

    fn config_event(
        &self,
        _owner: &Owner<'_>,
        event: &mut SchemaEvent,
        sources: &Sources<'_>,
        report: &mut ConfigReport,
    ) {
        sources.apply_into(event.features.get_mut::<ViewActionFeatures>(), report);
    }

    fn end_config_class(
        &self,
        class: &mut SchemaClass,
        _registry: &SchemaRegistry,
        _report: &mut ConfigReport,
    ) {
        let added = update_field_dependencies(class);
        if added > 0 {
            debug!(class = %class.name(), added, "field dependencies updated");
        }

        let view = class.features.get_mut::<ViewClassFeatures>();
        if view.explicit_elements.is_true() {
            view.explicit_elements.set(false);
            class.consume_once(EXPLICIT_ELEMENTS_APPLIED);
        }
    }
}
