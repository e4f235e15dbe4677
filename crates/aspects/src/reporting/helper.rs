use features::render::{CHART, HTML, IMAGE, RICH_TEXT};
use features::{
    ReportingClassFeatures, ReportingFieldFeatures, ViewClassFeatures, ViewFieldFeatures,
};
use schema::{SchemaClass, SchemaField};

/// Reporting feature reads that fall back to the view aspect.
///
/// The fallback is skipped when the class turned `inheritViewConfiguration` off.
pub struct ReportingFeatures<'a> {
    class: &'a SchemaClass,
}

impl<'a> ReportingFeatures<'a> {
    pub fn new(class: &'a SchemaClass) -> Self {
        Self { class }
    }

    fn inherit_view(&self) -> bool {
        self.class
            .features
            .or_default::<ReportingClassFeatures>()
            .inherit_view_configuration
            .is_true()
    }

    fn field_text(
        &self,
        field: &SchemaField,
        reporting: impl Fn(&ReportingFieldFeatures) -> Option<String>,
        view: impl Fn(&ViewFieldFeatures) -> Option<String>,
    ) -> Option<String> {
        reporting(&*field.features.or_default::<ReportingFieldFeatures>()).or_else(|| {
            self.inherit_view()
                .then(|| view(&*field.features.or_default::<ViewFieldFeatures>()))
                .flatten()
        })
    }

    pub fn class_label(&self) -> Option<String> {
        let reporting = self.class.features.or_default::<ReportingClassFeatures>();
        reporting.label.get().cloned().or_else(|| {
            self.inherit_view()
                .then(|| {
                    self.class
                        .features
                        .or_default::<ViewClassFeatures>()
                        .label
                        .get()
                        .cloned()
                })
                .flatten()
        })
    }

    pub fn label(&self, field: &SchemaField) -> Option<String> {
        self.field_text(field, |r| r.label.get().cloned(), |v| v.label.get().cloned())
    }

    pub fn render(&self, field: &SchemaField) -> Option<String> {
        self.field_text(field, |r| r.render.get().cloned(), |v| v.render.get().cloned())
    }

    pub fn layout(&self, field: &SchemaField) -> Option<String> {
        self.field_text(field, |r| r.layout.get().cloned(), |v| v.layout.get().cloned())
    }

    /// Reporting visibility, else view visibility, else visible.
    pub fn is_visible(&self, field: &SchemaField) -> bool {
        let reporting = field.features.or_default::<ReportingFieldFeatures>();
        if let Some(visible) = reporting.visible.get() {
            return *visible;
        }
        if self.inherit_view() {
            if let Some(visible) = field.features.or_default::<ViewFieldFeatures>().visible.get() {
                return *visible;
            }
        }
        true
    }

    fn render_is(&self, field: &SchemaField, expected: &str) -> bool {
        self.render(field).as_deref() == Some(expected)
    }

    pub fn is_render_image(&self, field: &SchemaField) -> bool {
        self.render_is(field, IMAGE)
    }

    pub fn is_render_html(&self, field: &SchemaField) -> bool {
        self.render_is(field, HTML)
    }

    pub fn is_render_rich_text(&self, field: &SchemaField) -> bool {
        self.render_is(field, RICH_TEXT)
    }

    pub fn is_render_chart(&self, field: &SchemaField) -> bool {
        self.render_is(field, CHART)
    }

    /// Fields to include in a report, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &'a SchemaField> + '_ {
        self.class.fields().filter(|field| self.is_visible(field))
    }
}
