use crate::feature_record;

feature_record! {
    /// Reporting features of a class.
    pub struct ReportingClassFeatures(Reporting) keyed by ReportingClassFeature {
        Label => label: String = None;
        Render => render: String = None;
        Layout => layout: String = None;
        Entity => entity: String = None;
        ExplicitElements => explicit_elements: bool = Some(false);
        /// Fall back to view features for anything the reporting record leaves unset.
        InheritViewConfiguration => inherit_view_configuration: bool = Some(true);
        DocumentType => document_type: String = Some("pdf".to_string());
    }
}

feature_record! {
    /// Reporting features of a field.
    pub struct ReportingFieldFeatures(Reporting) keyed by ReportingFieldFeature {
        Label => label: String = None;
        Visible => visible: bool = None;
        Render => render: String = None;
        Layout => layout: String = None;
    }
}
