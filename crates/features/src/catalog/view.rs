use crate::feature_record;

feature_record! {
    /// View features of a class.
    pub struct ViewClassFeatures(View) keyed by ViewClassFeature {
        Label => label: String = None;
        Description => description: String = None;
        Render => render: String = None, inherited;
        Layout => layout: String = None, inherited;
        Style => style: String = None;
        /// Hide every field and action without an explicit `visible` once; consumed afterwards.
        ExplicitElements => explicit_elements: bool = Some(false);
        Columns => columns: i64 = Some(1);
        OrderAreas => order_areas: Vec<String> = None;
        /// Root area of the form layout taken from the descriptor.
        Form => form: String = None;
    }
}

feature_record! {
    /// View features of a field.
    pub struct ViewFieldFeatures(View) keyed by ViewFieldFeature {
        Label => label: String = None;
        Description => description: String = None;
        Visible => visible: bool = Some(true);
        Enabled => enabled: bool = Some(true);
        Render => render: String = None;
        Layout => layout: String = None;
        Style => style: String = None;
        /// Sibling fields this one reacts to.
        DependsOn => depends_on: Vec<String> = None;
        /// Sibling fields to refresh when this one changes. Derived from `dependsOn`.
        Depends => depends: Vec<String> = None;
        SelectionField => selection_field: String = None;
        SelectionMode => selection_mode: i64 = Some(0);
        Format => format: String = None;
        DisplayWith => display_with: String = None;
    }
}

feature_record! {
    /// View features of an action or an event.
    pub struct ViewActionFeatures(View) keyed by ViewActionFeature {
        Label => label: String = None;
        Description => description: String = None;
        Visible => visible: bool = Some(true);
        Enabled => enabled: bool = Some(true);
        Render => render: String = None;
        Layout => layout: String = None;
        Style => style: String = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureKey, FeatureRecord, FeatureValue};
    use std::str::FromStr;

    #[test]
    fn keys_use_camel_case_names() {
        assert_eq!(ViewFieldFeature::DependsOn.name(), "dependsOn");
        assert_eq!(
            ViewClassFeature::from_str("explicitElements").ok(),
            Some(ViewClassFeature::ExplicitElements)
        );
        assert_eq!(ViewFieldFeatures::key("nope"), None);
    }

    #[test]
    fn only_render_and_layout_inherit_on_classes() {
        assert!(ViewClassFeature::Render.inherited());
        assert!(ViewClassFeature::Layout.inherited());
        assert!(!ViewClassFeature::Label.inherited());
        assert!(!ViewFieldFeature::Render.inherited());
    }

    #[test]
    fn declared_defaults_are_visible_through_keys() {
        let view = ViewClassFeatures::default();
        assert_eq!(view.get(ViewClassFeature::Columns), Some(FeatureValue::Int(1)));
        assert_eq!(view.get(ViewClassFeature::Render), None);
        assert!(!view.is_set(ViewClassFeature::Columns));
    }

    #[test]
    fn raw_values_are_parsed_by_declared_type() {
        let mut field = ViewFieldFeatures::default();
        field.set_raw(ViewFieldFeature::Visible, "false").unwrap();
        field.set_raw(ViewFieldFeature::DependsOn, "a, b").unwrap();
        assert_eq!(field.visible.get(), Some(&false));
        assert_eq!(field.depends_on.items(), ["a".to_string(), "b".to_string()]);
    }
}
