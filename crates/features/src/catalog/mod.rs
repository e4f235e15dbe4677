//! The feature records of every aspect.

mod core_aspect;
mod flow;
mod geo;
mod reporting;
mod view;

pub use core_aspect::{CoreFieldFeature, CoreFieldFeatures};
pub use flow::{FlowActionFeature, FlowActionFeatures};
pub use geo::{GeoFieldFeature, GeoFieldFeatures};
pub use reporting::{
    ReportingClassFeature, ReportingClassFeatures, ReportingFieldFeature, ReportingFieldFeatures,
};
pub use view::{
    ViewActionFeature, ViewActionFeatures, ViewClassFeature, ViewClassFeatures, ViewFieldFeature,
    ViewFieldFeatures,
};

/// Well-known render and layout values shared across aspects.
pub mod render {
    pub const ACCORDION: &str = "accordion";
    pub const EXPAND: &str = "expand";
    pub const MENU: &str = "menu";
    pub const OBJECT_EMBEDDED: &str = "objectembedded";

    pub const IMAGE: &str = "image";
    pub const HTML: &str = "html";
    pub const RICH_TEXT: &str = "richtext";
    pub const CHART: &str = "chart";
}
